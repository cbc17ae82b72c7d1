pub mod paths;
pub mod requirements;
pub mod shell;
