//! Repository modules. Each adds methods to `AosService` via `impl AosService`.

pub mod audit;
pub mod case;
pub mod dashboard;
pub mod fanout;
pub mod goal;
pub mod insight;
pub mod seed;
pub mod session;
pub mod user;
