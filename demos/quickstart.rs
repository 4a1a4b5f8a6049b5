//! Quick-start examples for the Docparser Rust client.
//!
//! Run with:
//!   DOCPARSER_API_KEY=... cargo run --example quickstart
//!
//! Or pass the key directly in code (not recommended for production).

use docparser::{ClientBuilder, ListMode, ResultsQuery, SortBy, SortOrder};

#[tokio::main]
async fn main() -> docparser::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Log in (reads DOCPARSER_API_KEY, then verifies the key with a ping)
    // -----------------------------------------------------------------------
    let client = ClientBuilder::new().login().await?;
    println!("Connected.");

    // Or provide the key directly and skip the connectivity check:
    // let client = docparser::Client::new("your_api_key");

    // -----------------------------------------------------------------------
    // 2. List parsers and their model layouts
    // -----------------------------------------------------------------------
    let parsers = client.list_parsers().await?;
    for parser in &parsers {
        println!("  {} ({})", parser.label, parser.id);
    }

    let first_label = match parsers.first() {
        Some(parser) => parser.label.clone(),
        None => {
            println!("No parsers on this account; create one at docparser.com first.");
            return Ok(());
        }
    };

    let layouts = client.list_parser_model_layouts(&first_label).await?;
    println!("{} model layout(s) on \"{first_label}\"", layouts.len());

    // -----------------------------------------------------------------------
    // 3. Upload a document three ways
    // -----------------------------------------------------------------------
    let document_id = client
        .upload_by_path("~/invoices/march.pdf", &first_label, Some("order-1042"))
        .await?;
    println!("Uploaded file as document {document_id}");

    let encoded = "JVBERi0xLjQK..."; // base64 of the file content
    let from_base64 = client
        .upload_by_base64(encoded, "march.pdf", &first_label, None)
        .await?;
    println!("Uploaded base64 content as document {from_base64}");

    let from_url = client
        .upload_by_url("https://example.com/invoice.pdf", &first_label, None)
        .await?;
    println!("Service fetched URL as document {from_url}");

    // -----------------------------------------------------------------------
    // 4. Fetch one parsed result (children included)
    // -----------------------------------------------------------------------
    let result = client.get_one_result(&first_label, &document_id, true).await?;
    println!("{result:#}");

    // -----------------------------------------------------------------------
    // 5. Fetch a batch of results, oldest processed first
    // -----------------------------------------------------------------------
    let batch = client
        .get_multiple_results(
            &first_label,
            ResultsQuery {
                list: ListMode::ProcessedAfter,
                date: Some("2024-03-01T00:00:00".into()),
                sort_by: SortBy::ProcessedAt,
                sort_order: SortOrder::Asc,
                ..Default::default()
            },
        )
        .await?;
    println!("{batch:#}");

    Ok(())
}
