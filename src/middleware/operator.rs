// src/middleware/operator.rs

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

// O nome do nosso cabeçalho HTTP customizado
const OPERATOR_HEADER: &str = "x-operator";

const UNKNOWN_OPERATOR: &str = "desconhecido";

/// Quem está operando o lançamento (gravado no registro para auditoria).
#[derive(Debug, Clone)]
pub struct OperatorContext(pub String);

impl<S> FromRequestParts<S> for OperatorContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let operator = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_OPERATOR)
            .to_string();

        Ok(OperatorContext(operator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> String {
        let (mut parts, _) = request.into_parts();
        let OperatorContext(name) = OperatorContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        name
    }

    #[tokio::test]
    async fn test_operator_header() {
        let request = Request::builder().header(OPERATOR_HEADER, " maria ").body(()).unwrap();
        assert_eq!(extract(request).await, "maria");

        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await, UNKNOWN_OPERATOR);
    }
}
