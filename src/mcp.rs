use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::page_order::PageOrder;
use crate::page_range::{Rejection, Selection};
use crate::pdf::{PdfDocument, Rotation};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPagesRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5,10'), one-based")]
    pub pages: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges to keep (e.g., '1-5,10')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRemoveRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges to remove (e.g., '2,7-9')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfReorderRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Explicit output order (e.g., '3,1,2'); every page exactly once. Omit for document order.")]
    pub order: Option<String>,
    #[schemars(description = "Reverse the final order (default: false)")]
    #[serde(default)]
    pub reverse: bool,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRotateRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges to rotate (e.g., '1,4-6')")]
    pub pages: String,
    #[schemars(description = "Clockwise degrees: 90, 180, or 270")]
    pub by: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including title, author, creator, producer, creation date, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    title: info.title,
                    author: info.author,
                    creator: info.creator,
                    producer: info.producer,
                    creation_date: info.creation_date,
                    subject: info.subject,
                    keywords: info.keywords,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Resolve a page range expression against a PDF: canonical form, resolved page numbers, and any dropped tokens")]
    fn pdf_pages(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        let total = doc.page_count();

        let (selection, rejected) = Selection::parse_report(&req.pages, total);
        let result = PagesResult {
            total_pages: total,
            page_count: selection.len() as u32,
            pages: selection.iter().map(|page| page.number().get()).collect(),
            selection: selection.format(),
            rejected: rejections(&rejected),
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Extract the selected pages of a PDF into a new file. Page ranges are one-based, e.g. '1-5,10'.")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfExtractRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        let total = doc.page_count();

        // Dropped tokens are silent here; pdf_pages reports them.
        let selection = Selection::parse(&req.pages, total);
        if selection.is_empty() {
            return format!(
                "Error: {:?} selects no pages (document has {})",
                req.pages, total
            );
        }

        let mut new_doc = match doc.assemble(selection.indices()) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        if let Err(e) = PdfDocument::save(&mut new_doc, &req.output) {
            return format!("Error: {}", e);
        }

        let result = ExtractResult {
            output_path: req.output,
            page_count: selection.len() as u32,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Remove the selected pages from a PDF, writing the remaining pages to a new file. Refuses to remove every page.")]
    fn pdf_remove(&self, Parameters(req): Parameters<PdfRemoveRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        let total = doc.page_count();

        let selection = Selection::parse(&req.pages, total);
        if selection.is_empty() {
            return format!(
                "Error: {:?} selects no pages (document has {})",
                req.pages, total
            );
        }

        let keep = selection.complement(total);
        if keep.is_empty() {
            return format!(
                "Error: Cannot remove every page ({} selected, document has {})",
                selection.len(),
                total
            );
        }

        let mut new_doc = match doc.assemble(keep.indices()) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        if let Err(e) = PdfDocument::save(&mut new_doc, &req.output) {
            return format!("Error: {}", e);
        }

        let result = RemoveResult {
            output_path: req.output,
            removed: selection.len() as u32,
            kept: keep.len() as u32,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Write the pages of a PDF in a new order. The order lists every page exactly once; position in the list is position in the output.")]
    fn pdf_reorder(&self, Parameters(req): Parameters<PdfReorderRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        let total = doc.page_count();

        let mut order = match req.order.as_deref() {
            Some(spec) => match PageOrder::parse(spec, total) {
                Ok(order) => order,
                Err(e) => return format!("Error: {}", e),
            },
            None => PageOrder::identity(total),
        };
        if req.reverse {
            order.reverse();
        }
        if order.is_empty() {
            return "Error: Document has no pages".to_string();
        }

        let mut new_doc = match doc.assemble(order.as_indices()) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        if let Err(e) = PdfDocument::save(&mut new_doc, &req.output) {
            return format!("Error: {}", e);
        }

        let result = ReorderResult {
            output_path: req.output,
            page_count: order.len() as u32,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Rotate the selected pages of a PDF clockwise by 90, 180, or 270 degrees, writing the result to a new file")]
    fn pdf_rotate(&self, Parameters(req): Parameters<PdfRotateRequest>) -> String {
        let rotation = match req.by.parse::<Rotation>() {
            Ok(rotation) => rotation,
            Err(e) => return format!("Error: {}", e),
        };

        let mut doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        let total = doc.page_count();

        let selection = Selection::parse(&req.pages, total);
        if selection.is_empty() {
            return format!(
                "Error: {:?} selects no pages (document has {})",
                req.pages, total
            );
        }

        if let Err(e) = doc.rotate_pages(selection.indices(), rotation) {
            return format!("Error: {}", e);
        }
        if let Err(e) = PdfDocument::save(&mut doc.doc, &req.output) {
            return format!("Error: {}", e);
        }

        let result = RotateResult {
            output_path: req.output,
            page_count: selection.len() as u32,
            degrees: rotation.degrees(),
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RejectionResult {
    pub token: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PagesResult {
    pub total_pages: u32,
    pub page_count: u32,
    pub pages: Vec<u32>,
    pub selection: String,
    pub rejected: Vec<RejectionResult>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractResult {
    pub output_path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RemoveResult {
    pub output_path: String,
    pub removed: u32,
    pub kept: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ReorderResult {
    pub output_path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RotateResult {
    pub output_path: String,
    pub page_count: u32,
    pub degrees: i64,
}

fn rejections(rejected: &[Rejection]) -> Vec<RejectionResult> {
    rejected
        .iter()
        .map(|rejection| RejectionResult {
            token: rejection.token.clone(),
            reason: rejection.reason.to_string(),
        })
        .collect()
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Page-oriented PDF tools. Use pdf_info for document metadata, pdf_pages to \
                 resolve a page range expression, pdf_extract to keep selected pages, \
                 pdf_remove to drop selected pages, pdf_reorder to rearrange pages, and \
                 pdf_rotate to rotate selected pages."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
