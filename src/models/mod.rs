pub mod model;
pub mod ou_process;
