use crate::error::ApiError;
use crate::models::{
    IdentityBatchResponse, IdentityQuery, IdentityResponse, IdentityTypesResponse,
};
use axum::extract::Query;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;
use relay_core::identity;

const MAX_COUNT: usize = 100;

fn parse_count(raw: &str) -> Result<usize, ApiError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if (1..=MAX_COUNT).contains(&count) => Ok(count),
        _ => Err(ApiError::Validation(format!(
            "count must be an integer between 1 and {}",
            MAX_COUNT
        ))),
    }
}

/// Answers one identity query. `types` wins over `count`, which wins over `type`.
fn respond<R: Rng>(query: IdentityQuery, rng: &mut R) -> Result<Response, ApiError> {
    if query.types.as_deref() == Some("true") {
        return Ok(Json(IdentityTypesResponse {
            types: identity::list_types(),
            description: "all available identity types",
        })
        .into_response());
    }

    if let Some(raw) = query.count.as_deref().filter(|c| !c.is_empty()) {
        let count = parse_count(raw)?;
        return Ok(Json(IdentityBatchResponse {
            count,
            identities: identity::generate_many(count, rng),
        })
        .into_response());
    }

    let kind = query.kind.filter(|k| !k.is_empty());
    let identity = identity::generate(kind.as_deref(), rng);
    Ok(Json(IdentityResponse {
        identity,
        kind: kind.unwrap_or_else(|| "random".to_string()),
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn identity_handler(Query(query): Query<IdentityQuery>) -> Result<Response, ApiError> {
    respond(query, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_bounds() {
        assert_eq!(parse_count("1").unwrap(), 1);
        assert_eq!(parse_count("100").unwrap(), 100);
        for bad in ["0", "101", "-3", "abc", "2.5", ""] {
            assert!(matches!(parse_count(bad), Err(ApiError::Validation(_))), "{}", bad);
        }
    }
}
