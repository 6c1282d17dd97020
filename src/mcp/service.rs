//! MCP service implementation using rmcp.
//!
//! [`SqliteService`] advertises the operation registry through `tools/list`
//! and forwards every `tools/call` to the [`OperationRouter`]. Tool calls are
//! routed by hand rather than through rmcp's tool macros so that unknown
//! names come back as failure results instead of protocol errors.

use crate::tools::{ContentBlock, OperationRouter, ToolResponse};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct SqliteService {
    router: Arc<OperationRouter>,
}

impl SqliteService {
    pub fn new(router: Arc<OperationRouter>) -> Self {
        Self { router }
    }

    /// Tool entries for every registered operation.
    pub fn tools(&self) -> Vec<Tool> {
        self.router
            .registry()
            .descriptors()
            .iter()
            .map(|d| Tool::new(d.name, d.description, d.input_schema.clone()))
            .collect()
    }
}

impl From<ToolResponse> for CallToolResult {
    fn from(response: ToolResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Content::text(text),
            })
            .collect();
        if response.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

impl ServerHandler for SqliteService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-sqlite-server".to_owned(),
                title: Some("SQLite MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for a single SQLite database file.\n\
                \n\
                - `db_info` reports the file path, size and table count\n\
                - `list_tables` and `get_table_schema` describe the schema\n\
                - `query` runs raw SQL with optional ? placeholder values\n\
                - `create_record`, `read_records`, `update_records` and `delete_records`\n\
                  work on one table using column/value objects"
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "tools/call");
        let response = self.router.call(&request.name, request.arguments).await;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteHandler;
    use crate::error::DbError;

    async fn create_test_service() -> SqliteService {
        let db = SqliteHandler::in_memory().await.unwrap();
        SqliteService::new(Arc::new(OperationRouter::new(Arc::new(db))))
    }

    #[tokio::test]
    async fn test_server_info() {
        let service = create_test_service().await;
        let info = service.get_info();
        assert_eq!(info.server_info.name, "mcp-sqlite-server");
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_tools_cover_every_operation() {
        let service = create_test_service().await;
        let tools = service.tools();
        assert_eq!(tools.len(), 8);
        assert!(tools.iter().any(|t| t.name == "get_table_schema"));
        assert!(tools.iter().all(|t| t.description.is_some()));
    }

    #[test]
    fn test_failure_response_maps_to_error_result() {
        let response = ToolResponse::failure("Error: ", &DbError::engine("boom"));
        let result: CallToolResult = response.into();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn test_success_response_maps_to_success_result() {
        let result: CallToolResult = ToolResponse::text("[]").into();
        assert_eq!(result.is_error, Some(false));
    }
}
