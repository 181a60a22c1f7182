//! Raw GraphQL and `/dynamic` write passthrough.
//!
//! Reads go through `POST /graphql`; creates and updates go through
//! `POST /dynamic`, where omitting `id` creates a record and including it
//! updates one.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GraphQlError, HavonaError};
use crate::rest::HavonaClient;
use crate::rest::endpoints::{DYNAMIC, GRAPHQL};
use crate::types::serde_helpers::null_as_default;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Value>,
}

/// Internal response wrapper for GraphQL responses.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    errors: Vec<Value>,
}

impl HavonaClient {
    /// Run a GraphQL query against `/graphql` and return its `data` object.
    ///
    /// A response carrying a non-empty `errors` array fails with
    /// [`HavonaError::GraphQl`]. A missing `data` is returned as an empty object.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use havona_client::HavonaClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = HavonaClient::from_env()?;
    ///     let data = client
    ///         .graphql("query { queryTradeContract(first: 3) { id contractNo status } }", None)
    ///         .await?;
    ///     println!("{}", data);
    ///     Ok(())
    /// }
    /// ```
    pub async fn graphql(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Value, HavonaError> {
        // An empty variables object is dropped from the request.
        let variables = variables.filter(|v| !matches!(v, Value::Object(m) if m.is_empty()));
        let request = GraphQlRequest {
            query,
            variables: variables.as_ref(),
        };

        let response: GraphQlResponse = self.send_json(Method::POST, GRAPHQL, &request).await?;
        if !response.errors.is_empty() {
            return Err(HavonaError::GraphQl(GraphQlError::new(response.errors)));
        }

        Ok(match response.data {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(data) => data,
        })
    }

    /// Run a GraphQL query and deserialize its `data` object into `T`.
    pub async fn graphql_as<T>(&self, query: &str, variables: Option<Value>) -> Result<T, HavonaError>
    where
        T: DeserializeOwned,
    {
        let data = self.graphql(query, variables).await?;
        serde_json::from_value(data)
            .map_err(|e| HavonaError::InvalidResponse(format!("Unexpected GraphQL data: {e}")))
    }

    /// Write a record through `/dynamic`.
    ///
    /// The request body is `{"type": type_name, ...payload}`; keys in `payload`
    /// win over the injected `type`. Omit `id` to create, include it to update.
    /// Returns the persisted record as echoed by the server.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use havona_client::HavonaClient;
    /// use serde_json::{Map, json};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = HavonaClient::from_env()?;
    ///     let mut payload = Map::new();
    ///     payload.insert("contractNo".into(), json!("TC-001"));
    ///     payload.insert("status".into(), json!("DRAFT"));
    ///     let record = client.write("TradeContract", payload).await?;
    ///     println!("Created {}", record["id"]);
    ///     Ok(())
    /// }
    /// ```
    pub async fn write(
        &self,
        type_name: &str,
        payload: Map<String, Value>,
    ) -> Result<Value, HavonaError> {
        let mut body = Map::with_capacity(payload.len() + 1);
        body.insert("type".to_string(), Value::String(type_name.to_string()));
        body.extend(payload);

        self.send_json(Method::POST, DYNAMIC, &body).await
    }
}
