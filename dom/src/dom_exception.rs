use thiserror::Error;

// SPECLINK: https://webidl.spec.whatwg.org/#idl-DOMException
#[derive(Error, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum DomException {
    #[error("The index is not in the allowed range.")]
    IndexSizeError,
    #[error("The operation would yield an incorrect node tree.")]
    HierarchyRequestError,
    #[error("The object is in the wrong document.")]
    WrongDocumentError,
    #[error("The object can not be found here.")]
    NotFoundError,
    #[error("The operation is not supported.")]
    NotSupportedError,
    #[error("The object is in an invalid state.")]
    InvalidStateError,
    #[error("The supplied node is incorrect or has an incorrect ancestor for this operation.")]
    InvalidNodeTypeError,
}

impl DomException {
    pub const INDEX_SIZE_ERR: u16 = 1;
    pub const HIERARCHY_REQUEST_ERR: u16 = 3;
    pub const WRONG_DOCUMENT_ERR: u16 = 4;
    pub const NOT_FOUND_ERR: u16 = 8;
    pub const NOT_SUPPORTED_ERR: u16 = 9;
    pub const INVALID_STATE_ERR: u16 = 11;
    pub const INVALID_NODE_TYPE_ERR: u16 = 24;

    /// The name from the error names table, e.g. `"IndexSizeError"`.
    pub fn name(&self) -> &'static str {
        match self {
            DomException::IndexSizeError => "IndexSizeError",
            DomException::HierarchyRequestError => "HierarchyRequestError",
            DomException::WrongDocumentError => "WrongDocumentError",
            DomException::NotFoundError => "NotFoundError",
            DomException::NotSupportedError => "NotSupportedError",
            DomException::InvalidStateError => "InvalidStateError",
            DomException::InvalidNodeTypeError => "InvalidNodeTypeError",
        }
    }

    /// The legacy numeric code.
    pub fn code(&self) -> u16 {
        match self {
            DomException::IndexSizeError => Self::INDEX_SIZE_ERR,
            DomException::HierarchyRequestError => Self::HIERARCHY_REQUEST_ERR,
            DomException::WrongDocumentError => Self::WRONG_DOCUMENT_ERR,
            DomException::NotFoundError => Self::NOT_FOUND_ERR,
            DomException::NotSupportedError => Self::NOT_SUPPORTED_ERR,
            DomException::InvalidStateError => Self::INVALID_STATE_ERR,
            DomException::InvalidNodeTypeError => Self::INVALID_NODE_TYPE_ERR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DomException;

    #[test]
    fn names_and_codes() {
        assert_eq!(DomException::IndexSizeError.code(), 1);
        assert_eq!(DomException::InvalidNodeTypeError.code(), 24);
        assert_eq!(
            DomException::WrongDocumentError.name(),
            "WrongDocumentError"
        );
        assert_eq!(
            DomException::HierarchyRequestError.to_string(),
            "The operation would yield an incorrect node tree."
        );
    }
}
