use std::io::Read;

use crate::config::AppConfig;
use crate::error::Result;
use crate::masking::MaskingEngine;

/// Mask `text`, or stdin when no text is given, and print the result.
pub fn run(config: &AppConfig, text: Option<&str>) -> Result<()> {
    let engine = MaskingEngine::compile(&config.masking)?;

    let masked = match text {
        Some(text) => engine.mask(text).into_owned(),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            engine.mask(strip_line_ending(&buf)).into_owned()
        }
    };

    println!("{}", masked);
    Ok(())
}

/// Drop the single line ending a shell pipe adds; `println!` puts it back.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}
