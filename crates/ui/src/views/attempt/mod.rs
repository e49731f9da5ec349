mod actions;
mod state;
mod view;

pub(crate) use actions::send_submit;
pub use view::AttemptView;
