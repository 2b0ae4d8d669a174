//! Graph edge plumbing shared by membership and association resources
//!
//! Edges are added and removed with `POST <edges path>` carrying
//! `{"op": "add" | "remove", "type": <target type>, "id": <target id>}` and
//! listed with `GET <edges path>`.

use cloudir_client::{DirectoryClient, Method};
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum EdgeOp {
    Add,
    Remove,
}

#[derive(Debug, Serialize)]
struct EdgeRequest<'a> {
    op: EdgeOp,
    #[serde(rename = "type")]
    target_type: &'a str,
    id: &'a str,
}

/// One listed edge.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Edge {
    pub to: EdgeTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EdgeTarget {
    pub id: String,
    #[serde(rename = "type")]
    pub target_type: String,
}

/// Add or remove one edge.
pub(crate) async fn modify_edge(
    client: &DirectoryClient,
    path: &str,
    op: EdgeOp,
    target_type: &str,
    target_id: &str,
) -> ProviderResult<()> {
    let request = EdgeRequest {
        op,
        target_type,
        id: target_id,
    };
    client
        .send_json_no_content(Method::POST, path, &request)
        .await?;
    Ok(())
}

/// Whether an edge to `target_id` of `target_type` exists.
///
/// `targets` narrows the listing to one target type where the endpoint
/// requires it.
pub(crate) async fn edge_exists(
    client: &DirectoryClient,
    path: &str,
    targets: Option<&str>,
    target_type: &str,
    target_id: &str,
) -> ProviderResult<bool> {
    let query: Vec<(&str, String)> = targets
        .map(|t| vec![("targets", t.to_string())])
        .unwrap_or_default();

    let edges: Vec<Edge> = client.list_all_with_query(path, &query).await?;
    Ok(edges
        .iter()
        .any(|e| e.to.id == target_id && e.to.target_type == target_type))
}
