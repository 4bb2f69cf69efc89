mod case;
mod feedback;
mod goal;
mod insight;
mod session;
mod user;

pub use case::CaseCommands;
pub use feedback::{FeedbackCommands, SubmitArgs};
pub use goal::GoalCommands;
pub use insight::InsightCommands;
pub use session::SessionCommands;
pub use user::UserCommands;
