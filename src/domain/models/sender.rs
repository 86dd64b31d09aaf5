use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Ai,
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sender::User => return write!(f, "You"),
            Sender::Ai => return write!(f, "AI Tutor"),
            Sender::System => return write!(f, "Tutor"),
        }
    }
}
