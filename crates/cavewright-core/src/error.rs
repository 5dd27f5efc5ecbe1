use thiserror::Error;

#[derive(Debug, Error)]
pub enum CavewrightError {
    #[error("'{key}' is not a valid attribute for {feature}")]
    UnknownAttribute { feature: &'static str, key: String },

    #[error("invalid value for attribute '{key}': {help}")]
    InvalidAttribute { key: &'static str, help: String },

    #[error("attribute '{key}' on {feature} is not set and has no default")]
    AttributeUnset { feature: &'static str, key: String },

    #[error("malformed action XML: {0}")]
    MalformedXml(String),

    #[error("'{0}' is not a valid action tag")]
    UnknownTag(String),

    #[error("consistency error: {0}")]
    Consistency(String),

    #[error(transparent)]
    Parse(#[from] xmltree::ParseError),
}

pub type Result<T> = std::result::Result<T, CavewrightError>;
