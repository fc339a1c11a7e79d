#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod options;

pub mod util {
    pub mod naming;
}

pub mod container {
    pub mod manifest;
}

pub mod split {
    pub mod writer;
}

pub mod read {
    pub mod rebuild;
}

pub mod batch {
    pub mod clean;
    pub mod walker;
}

pub mod list;

// Re-exports: stable API surface
pub use batch::clean::clean;
pub use batch::walker::split_dir;
pub use container::manifest::Manifest;
pub use list::inspect;
pub use options::ChunkOptions;
pub use read::rebuild::rebuild;
pub use split::writer::split;
