use miette::{IntoDiagnostic, WrapErr};

fn open(
    file: &std::path::Path,
    args: &crate::cli::OpenArgs,
) -> miette::Result<doc_core::Segment> {
    doc_core::Segment::open_with(file, &args.options())
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to open {}", file.display()))
}

fn save(segment: &doc_core::Segment) -> miette::Result<()> {
    segment
        .save()
        .into_diagnostic()
        .wrap_err("failed to save document")?;

    Ok(())
}

/// Executes one parsed command, writing any output to `out`.
///
/// # Errors
///
/// Returns a diagnostic if the document cannot be opened, edited, or saved,
/// or if writing to `out` fails.
pub fn run(cli: &crate::cli::Cli, out: &mut impl std::io::Write) -> miette::Result<()> {
    match &cli.command {
        crate::cli::Command::Cat { file, tab_width } => {
            let segment = open(file, &cli.open)?;

            for line in segment.lines() {
                out.write_all(&crate::render::expand_line(&line, *tab_width))
                    .into_diagnostic()?;
                out.write_all(b"\n").into_diagnostic()?;
            }

            segment.close();
        }
        crate::cli::Command::Slice { file, begin, end } => {
            let segment = open(file, &cli.open)?;
            let begin = segment.get_point(*begin).into_diagnostic()?;
            let end = segment.get_point(*end).into_diagnostic()?;
            let view = segment
                .subseg(&begin, &end)
                .into_diagnostic()
                .wrap_err("invalid range")?;

            for slice in &view {
                out.write_all(slice).into_diagnostic()?;
            }
        }
        crate::cli::Command::Append { file, text } => {
            let mut segment = open(file, &cli.open)?;

            segment.write(text.as_bytes()).into_diagnostic()?;
            save(&segment)?;
        }
        crate::cli::Command::Insert { file, offset, text } => {
            let mut segment = open(file, &cli.open)?;

            segment
                .insert_at(*offset, text.as_bytes())
                .into_diagnostic()?;
            save(&segment)?;
        }
        crate::cli::Command::Remove { file, begin, end } => {
            let mut segment = open(file, &cli.open)?;

            segment.remove_range(*begin, *end).into_diagnostic()?;
            save(&segment)?;
        }
        crate::cli::Command::Stat { file } => {
            let segment = open(file, &cli.open)?;

            writeln!(out, "path:   {}", file.display()).into_diagnostic()?;
            writeln!(out, "bytes:  {}", segment.len()).into_diagnostic()?;
            writeln!(out, "pieces: {}", segment.piece_count()).into_diagnostic()?;
            writeln!(out, "lines:  {}", segment.lines().count()).into_diagnostic()?;
        }
    }

    Ok(())
}
