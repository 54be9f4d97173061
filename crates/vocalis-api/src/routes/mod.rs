pub mod docs;
pub mod health;
pub mod history;
pub mod process;
