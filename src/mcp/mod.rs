//! MCP server implementation for mcd-target-hunter.
//!
//! Exposes scanning and the saved configuration as MCP tools for editors.

use std::borrow::Cow;
use std::fmt::Write;
use std::path::PathBuf;

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::Deserialize;

use crate::commands::{self, ScanOverrides, ScanSummary};
use crate::config::AppConfig;

/// Number of hits listed in a scan tool response.
const PREVIEW_HITS: usize = 20;

/// Parameters for `scan_mcd_file` tool.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ScanParams {
    #[schemars(description = "Path to the post-processor output file (default: last saved input)")]
    pub input_path: Option<String>,
    #[schemars(description = "Folder for the CSV report (default: saved folder, then desktop)")]
    pub output_dir: Option<String>,
    #[schemars(description = "Target search text (default: saved value)")]
    pub target_text: Option<String>,
    #[schemars(description = "Parent search text")]
    pub parent_text: Option<String>,
    #[schemars(description = "Track parent lines")]
    pub use_parent: Option<bool>,
    #[schemars(description = "Operation number search text")]
    pub op_no_text: Option<String>,
    #[schemars(description = "Tool change search text")]
    pub tool_change_text: Option<String>,
    #[schemars(description = "Use case-sensitive matching")]
    pub case_sensitive: Option<bool>,
}

impl From<ScanParams> for ScanOverrides {
    fn from(params: ScanParams) -> Self {
        Self {
            input: params.input_path.map(PathBuf::from),
            output_dir: params.output_dir.map(PathBuf::from),
            target_text: params.target_text,
            parent_text: params.parent_text,
            use_parent: params.use_parent,
            op_no_text: params.op_no_text,
            tool_change_text: params.tool_change_text,
            case_sensitive: params.case_sensitive,
        }
    }
}

/// Render a scan summary as markdown.
fn format_summary(summary: &ScanSummary) -> String {
    let mut output = format!(
        "**Input:** {}\n**Report:** {}\n**Total hits:** {}\n",
        summary.input.display(),
        summary.report_path.display(),
        summary.total_hits
    );

    for hit in summary.hits.iter().take(PREVIEW_HITS) {
        let _ = write!(
            output,
            "\n## Hit {} (line {})\n`{}`\n- **Operation:** {}\n- **Tool:** {}\n- **Tool change:** {}\n- **Parent:** {}\n",
            hit.hit_index,
            hit.line_number,
            hit.target_line,
            hit.operation_no_line,
            hit.tool_number_line,
            hit.tool_change_line,
            hit.parent_line
        );
    }

    if summary.total_hits > PREVIEW_HITS {
        let _ = write!(
            output,
            "\n*{} more hit(s) in the report*",
            summary.total_hits - PREVIEW_HITS
        );
    }

    output
}

/// Run a scan off the async runtime and render the result.
async fn run_scan_tool(overrides: ScanOverrides) -> Result<CallToolResult, McpError> {
    let result = tokio::task::spawn_blocking(move || commands::run_scan(&overrides, false))
        .await
        .map_err(|e| McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::from(format!("Scan task failed: {e}")),
            data: None,
        })?;

    match result {
        Ok(summary) => Ok(CallToolResult::success(vec![Content::text(format_summary(
            &summary,
        ))])),
        Err(e) => Err(McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::from(format!("Scan failed: {e}")),
            data: None,
        }),
    }
}

/// MCP server exposing mcd-target-hunter tools.
#[derive(Clone)]
pub struct HunterServer {
    tool_router: ToolRouter<Self>,
}

impl Default for HunterServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl HunterServer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Scan a CNC post-processor output file for target markers and write a CSV report")]
    async fn scan_mcd_file(
        &self,
        Parameters(params): Parameters<ScanParams>,
    ) -> Result<CallToolResult, McpError> {
        run_scan_tool(ScanOverrides::from(params)).await
    }

    #[tool(description = "Show the saved search settings and remembered paths")]
    async fn get_config(&self) -> Result<CallToolResult, McpError> {
        let config = AppConfig::load();

        match toml::to_string_pretty(&config) {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => Err(McpError {
                code: ErrorCode::INTERNAL_ERROR,
                message: Cow::from(format!("Failed to render config: {e}")),
                data: None,
            }),
        }
    }
}

#[tool_handler]
impl ServerHandler for HunterServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "mcd-target-hunter scans CNC post-processor output for a target marker and \
                reports the operation, tool and parent context of every hit. Use scan_mcd_file \
                to scan a file and write a CSV report, and get_config to see the saved defaults."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Start the MCP server with stdio transport.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn serve() -> anyhow::Result<()> {
    tracing::info!("starting MCP server on stdio");
    let server = HunterServer::new();
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
