// Purpose - external interfaces: canonical note names from input collaborators

pub mod note;

pub use note::NoteName;
