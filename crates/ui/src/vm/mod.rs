mod attempt_vm;
mod history_vm;
mod mock_vm;
mod results_vm;
mod time_fmt;

pub use attempt_vm::{
    AttemptScreenVm, NavCellVm, NavSectionVm, NavStatus, OptionVm, QuestionVm,
    build_attempt_screen, clamp_index,
};
pub use history_vm::{
    AnswerKeyVm, AttemptDetailsVm, AttemptRowVm, ReviewOptionVm, ReviewOutcome,
    ReviewQuestionVm, ReviewSectionVm, SectionChipVm, map_answer_key, map_attempt_details,
    map_attempt_rows,
};
pub use mock_vm::{MockCardVm, ResumePromptVm, map_mock_cards};
pub use results_vm::{ResultVm, ScoreTone, SectionResultVm};
pub use time_fmt::{format_countdown, format_datetime, format_span, is_low_time};
