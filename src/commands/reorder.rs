use crate::page_order::PageOrder;
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    order: Option<&str>,
    moves: &[String],
    reverse: bool,
    output: Q,
) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();

    let mut order = match order {
        Some(spec) => PageOrder::parse(spec, total_pages)?,
        None => PageOrder::identity(total_pages),
    };

    for spec in moves {
        let (from, to) = parse_move(spec, order.len())?;
        order.move_page(from, to);
    }

    if reverse {
        order.reverse();
    }

    if order.is_empty() {
        anyhow::bail!("Document has no pages");
    }

    // The order goes to the copy primitive as-is; position in the list is
    // position in the output.
    let mut new_doc = doc.assemble(order.as_indices())?;
    PdfDocument::save(&mut new_doc, &output)?;

    println!(
        "Wrote {} page(s) in new order to {}",
        order.len(),
        output.as_ref().display()
    );

    Ok(())
}

/// A move is "FROM:TO" in one-based positions of the current arrangement.
fn parse_move(spec: &str, total: usize) -> Result<(usize, usize)> {
    let (from, to) = spec
        .split_once(':')
        .with_context(|| format!("Move must look like FROM:TO (got {:?})", spec))?;
    Ok((parse_position(from, total)?, parse_position(to, total)?))
}

fn parse_position(s: &str, total: usize) -> Result<usize> {
    let position: usize = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid position: {:?}", s))?;
    if position == 0 || position > total {
        anyhow::bail!("Position {} is out of range (1-{})", position, total);
    }
    Ok(position - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("3:1", 5).unwrap(), (2, 0));
        assert_eq!(parse_move(" 1 : 5 ", 5).unwrap(), (0, 4));
    }

    #[test]
    fn test_parse_move_rejects_bad_input() {
        assert!(parse_move("3", 5).is_err());
        assert!(parse_move("0:2", 5).is_err());
        assert!(parse_move("2:6", 5).is_err());
        assert!(parse_move("a:b", 5).is_err());
    }
}
