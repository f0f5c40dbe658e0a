use crate::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SqlParse,
    ViewParse,
    ViewNotSelect,
    UnresolvedColumn,
    UnsupportedPayloadShape,
    SchemaTraversal,
    QueryComposition,
    Config,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SqlParse => "SQLAPI_ERROR_SQL_PARSE",
            Self::ViewParse => "SQLAPI_ERROR_VIEW_PARSE",
            Self::ViewNotSelect => "SQLAPI_ERROR_VIEW_NOT_SELECT",
            Self::UnresolvedColumn => "SQLAPI_ERROR_UNRESOLVED_COLUMN",
            Self::UnsupportedPayloadShape => "SQLAPI_ERROR_UNSUPPORTED_PAYLOAD_SHAPE",
            Self::SchemaTraversal => "SQLAPI_ERROR_SCHEMA_TRAVERSAL",
            Self::QueryComposition => "SQLAPI_ERROR_QUERY_COMPOSITION",
            Self::Config => "SQLAPI_ERROR_CONFIG",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::SqlParse,
            Self::ViewParse,
            Self::ViewNotSelect,
            Self::UnresolvedColumn,
            Self::UnsupportedPayloadShape,
            Self::SchemaTraversal,
            Self::QueryComposition,
            Self::Config,
        ]
    }
}

impl PartialEq<ErrorCode> for String {
    fn eq(&self, other: &ErrorCode) -> bool {
        self == other.as_str()
    }
}

fn build_error(code: ErrorCode, message: impl Into<String>) -> EngineError {
    EngineError::new(code.as_str(), message)
}

pub(crate) fn sql_parse_error(message: impl Into<String>) -> EngineError {
    build_error(ErrorCode::SqlParse, message)
}

pub(crate) fn view_parse_error(view_name: &str, detail: &str) -> EngineError {
    build_error(
        ErrorCode::ViewParse,
        format!("failed to parse view '{view_name}': {detail}"),
    )
}

pub(crate) fn view_not_select_error(view_name: &str, statement_kind: &str) -> EngineError {
    build_error(
        ErrorCode::ViewNotSelect,
        format!("view '{view_name}' of type '{statement_kind}' not yet supported"),
    )
}

pub(crate) fn unresolved_columns_error(missing: &[String]) -> EngineError {
    build_error(
        ErrorCode::UnresolvedColumn,
        format!(
            "cannot find the following columns: {}",
            missing.join(", ")
        ),
    )
}

pub(crate) fn unsupported_payload_shape_error(schema_name: &str) -> EngineError {
    build_error(
        ErrorCode::UnsupportedPayloadShape,
        format!(
            "templating of request body only supported for object type payload (schema '{schema_name}')"
        ),
    )
}

pub(crate) fn schema_traversal_error(message: impl Into<String>) -> EngineError {
    build_error(ErrorCode::SchemaTraversal, message)
}

pub(crate) fn query_composition_error(message: impl Into<String>) -> EngineError {
    build_error(ErrorCode::QueryComposition, message)
}

pub(crate) fn config_error(message: impl Into<String>) -> EngineError {
    build_error(ErrorCode::Config, message)
}
