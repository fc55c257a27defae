use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CartError {
    #[error("VRAM update list ends inside the entry starting at offset {0}")]
    TruncatedEntry(usize),
    #[error("VRAM update list is missing its end-of-list marker")]
    MissingTerminator,
    #[error("Sequential VRAM update at offset {0} has zero length")]
    EmptyRun(usize),
}
