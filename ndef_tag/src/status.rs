use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Write,
    Read,
}

/// What the session reports to the display layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    EnterMessage,
    NoTag(Operation),
    InProgress,
    Success,
    Message(String),
    Empty,
    Error,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Write => write!(f, "write"),
            Operation::Read => write!(f, "read"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::EnterMessage => write!(f, "please enter a message"),
            Status::NoTag(op) => write!(f, "no tag present ({})", op),
            Status::InProgress => write!(f, "in progress"),
            Status::Success => write!(f, "success"),
            Status::Message(message) => write!(f, "{}", message),
            Status::Empty => write!(f, "tag is empty"),
            Status::Error => write!(f, "error"),
        }
    }
}
