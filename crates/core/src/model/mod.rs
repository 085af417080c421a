mod answer;
mod bank;
mod ids;
mod question;
mod session;
mod settings;

pub use answer::AnswerRecord;
pub use bank::{BankEntry, QuestionBank};
pub use ids::{QuestionId, RecordId};
pub use question::{MIN_OPTIONS, Question, QuestionError};
pub use session::{SessionState, SessionSummary, SessionSummaryError};
pub use settings::{BankLocation, QuizSettings, QuizSettingsDraft, QuizSettingsError};
