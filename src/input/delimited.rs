use anyhow::Result;

/// One vector per line. Fields may be separated by tabs, commas or spaces;
/// blank lines and lines starting with `#` are skipped.
pub fn parse_delimited(content: &str) -> Result<Vec<Vec<f64>>> {
    let content_replace_windows_newline = content.replace("\r\n", "\n");
    let mut vectors = vec![];
    for (line_number, line) in content_replace_windows_newline.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let vector = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|field| {
                field.parse::<f64>().map_err(|_| {
                    anyhow::anyhow!("line {}: {:?} is not a number", line_number + 1, field)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        vectors.push(vector);
    }
    Ok(vectors)
}
