pub mod conversations;
pub mod system;
pub mod tasks;
