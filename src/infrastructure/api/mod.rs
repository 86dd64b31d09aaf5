mod tutor;

pub use tutor::*;
