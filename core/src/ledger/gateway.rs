//! Arweave gateway client.
//!
//! | Method | Path        | Use                                   |
//! |--------|-------------|---------------------------------------|
//! | POST   | `/tx`       | Submit a signed transaction           |
//! | POST   | `/graphql`  | Find transactions by tags and owners  |
//!
//! Queries follow `pageInfo.hasNextPage` until every match is collected.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::LedgerClient;
use crate::config::GalleryConfig;
use crate::error::{PublishError, PublishResult, QueryError, QueryResult};
use crate::models::{ContentId, SignedUnit, SubmitStatus, TagQuery};

const TRANSACTIONS_QUERY: &str = r#"query($owners: [String!], $tags: [TagFilter!], $first: Int, $after: String) {
  transactions(owners: $owners, tags: $tags, first: $first, after: $after) {
    pageInfo { hasNextPage }
    edges { cursor node { id } }
  }
}"#;

/// HTTP client for one gateway.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    gateway: String,
    page_size: u32,
}

impl GatewayClient {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            gateway: config.gateway.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        }
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    async fn fetch_page(&self, query: &TagQuery, after: Option<&str>) -> QueryResult<Page> {
        let body = json!({
            "query": TRANSACTIONS_QUERY,
            "variables": query_variables(query, self.page_size, after),
        });

        let response = self
            .http
            .post(format!("{}/graphql", self.gateway))
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QueryError::Status(response.status().as_u16()));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))?;
        parse_page(value)
    }
}

#[async_trait(?Send)]
impl LedgerClient for GatewayClient {
    async fn submit(&self, signed: &SignedUnit) -> PublishResult<SubmitStatus> {
        if !signed.envelope.is_object() {
            return Err(PublishError::Encode(format!(
                "transaction {} has no signed envelope",
                signed.id
            )));
        }

        let response = self
            .http
            .post(format!("{}/tx", self.gateway))
            .json(&signed.envelope)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let code = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        log::debug!("POST /tx {} -> {}", signed.id, code);

        Ok(SubmitStatus::new(code).with_detail(detail))
    }

    async fn query(&self, query: &TagQuery) -> QueryResult<Vec<ContentId>> {
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_page(query, cursor.as_deref()).await?;
            let last_cursor = page.edges.last().map(|e| e.cursor.clone());
            ids.extend(page.edges.into_iter().map(|e| ContentId::new(e.node.id)));

            match (page.has_next_page, last_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        log::debug!("GraphQL query matched {} transaction(s)", ids.len());
        Ok(ids)
    }
}

// =============================================================================
// GraphQL wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    transactions: Transactions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Transactions {
    page_info: PageInfo,
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct Edge {
    cursor: String,
    node: Node,
}

#[derive(Debug, Deserialize)]
struct Node {
    id: String,
}

#[derive(Debug)]
struct Page {
    edges: Vec<Edge>,
    has_next_page: bool,
}

/// GraphQL variables for one page of `query`.
fn query_variables(query: &TagQuery, first: u32, after: Option<&str>) -> Value {
    let tags: Vec<Value> = query
        .tags
        .iter()
        .map(|t| json!({ "name": t.name, "values": [t.value] }))
        .collect();

    let mut variables = json!({
        "tags": tags,
        "first": first,
        "after": after,
    });
    if !query.owners.is_empty() {
        variables["owners"] = json!(query.owners);
    }
    variables
}

fn parse_page(value: Value) -> QueryResult<Page> {
    let response: GraphqlResponse =
        serde_json::from_value(value).map_err(|e| QueryError::Decode(e.to_string()))?;

    if let Some(first) = response.errors.first() {
        return Err(QueryError::Graphql(first.message.clone()));
    }

    let transactions = response
        .data
        .ok_or_else(|| QueryError::Decode("missing data".to_string()))?
        .transactions;

    Ok(Page {
        edges: transactions.edges,
        has_next_page: transactions.page_info.has_next_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_shape() {
        let query = TagQuery::new().tag("App-Name", "demo").owner("addr");
        let vars = query_variables(&query, 100, Some("c1"));

        assert_eq!(vars["tags"][0]["name"], "App-Name");
        assert_eq!(vars["tags"][0]["values"][0], "demo");
        assert_eq!(vars["owners"][0], "addr");
        assert_eq!(vars["first"], 100);
        assert_eq!(vars["after"], "c1");
    }

    #[test]
    fn test_variables_without_owner() {
        let vars = query_variables(&TagQuery::new().tag("App-Name", "demo"), 10, None);
        assert!(vars.get("owners").is_none());
        assert!(vars["after"].is_null());
    }

    #[test]
    fn test_parse_page() {
        let page = parse_page(json!({
            "data": {
                "transactions": {
                    "pageInfo": { "hasNextPage": true },
                    "edges": [
                        { "cursor": "c1", "node": { "id": "tx1" } },
                        { "cursor": "c2", "node": { "id": "tx2" } }
                    ]
                }
            }
        }))
        .unwrap();

        assert!(page.has_next_page);
        assert_eq!(page.edges.len(), 2);
        assert_eq!(page.edges[1].node.id, "tx2");
    }

    #[test]
    fn test_parse_graphql_error() {
        let err = parse_page(json!({ "errors": [{ "message": "bad tag filter" }] })).unwrap_err();
        assert_eq!(err, QueryError::Graphql("bad tag filter".into()));
    }

    #[test]
    fn test_parse_missing_data() {
        assert!(matches!(parse_page(json!({})), Err(QueryError::Decode(_))));
    }

    #[test]
    fn test_gateway_trailing_slash() {
        let client = GatewayClient::new(&GalleryConfig {
            gateway: "https://arweave.net/".into(),
            ..GalleryConfig::default()
        });
        assert_eq!(client.gateway(), "https://arweave.net");
    }
}
