pub mod audit;
pub mod case;
pub mod dashboard;
pub mod dispatch;
pub mod feedback;
pub mod goal;
pub mod insight;
pub mod seed;
pub mod session;
pub mod shared;
pub mod user;
