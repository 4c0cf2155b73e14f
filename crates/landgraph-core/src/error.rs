pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed catalog document: {message}")]
    CatalogDocument { message: String },

    #[error("Replacement left a reference to the removed element {id}")]
    DanglingReplacement { id: String },
}
