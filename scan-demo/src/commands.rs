use std::path::Path;

use anyhow::Context;

use scan_core::{read_image_file, FileStore, HistoryEntry, HistoryLedger, MockAnalyzer, ScanSession};

use crate::still_camera::StillCamera;

pub type DemoSession = ScanSession<StillCamera, MockAnalyzer, HistoryLedger<FileStore>>;

pub async fn scan_file(session: &DemoSession, path: &Path) -> anyhow::Result<()> {
    let image = read_image_file(path, session.config())
        .with_context(|| format!("cannot use {}", path.display()))?;
    let entry = session.submit_upload(image).await?;
    print_result(&entry);
    Ok(())
}

pub async fn capture_photo(session: &DemoSession) -> anyhow::Result<()> {
    session.start_camera().await?;
    let entry = session.capture().await?;
    print_result(&entry);
    Ok(())
}

pub fn list_history(session: &DemoSession) -> anyhow::Result<()> {
    let entries = session.history_entries();
    if entries.is_empty() {
        println!("No scans yet. Scan a clothing item to get started.");
        return Ok(());
    }
    for (index, entry) in entries.iter().enumerate() {
        println!("{}", format_history_line(index, entry));
    }
    Ok(())
}

pub fn delete_entry(session: &DemoSession, index: usize) -> anyhow::Result<()> {
    session.delete_history_entry(index)?;
    Ok(())
}

pub fn clear_history(session: &DemoSession) -> anyhow::Result<()> {
    session.clear_history()?;
    Ok(())
}

pub fn share_entry(session: &DemoSession, index: usize) -> anyhow::Result<()> {
    let entries = session.history_entries();
    let entry = entries
        .get(index)
        .with_context(|| format!("no scan at index {} ({} in history)", index, entries.len()))?;
    println!("{}", entry.record.share_title());
    println!("{}", entry.record.share_text());
    Ok(())
}

fn print_result(entry: &HistoryEntry) {
    let record = &entry.record;
    println!();
    println!("{} - {} ({} match)", record.brand, record.item_type, record.confidence);
    println!("  Made in:       {}", record.origin);
    println!("  Manufacturer:  {}", record.manufacturer);
    if !record.retail_links.is_empty() {
        println!("  Where to buy:");
        for link in &record.retail_links {
            println!("    {:<14} {}", link.name, link.url);
        }
    }
}

fn format_history_line(index: usize, entry: &HistoryEntry) -> String {
    format!(
        "[{}] {}  {} {}, {} ({})",
        index,
        entry.timestamp.format("%Y-%m-%d %H:%M UTC"),
        entry.record.brand,
        entry.record.item_type,
        entry.record.origin,
        entry.record.confidence
    )
}
