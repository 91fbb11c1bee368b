use crate::definition::OptionDef;
use crate::registry::Registry;

/// Marker in a help template replaced by the option table.
pub const OPTIONS_MARKER: &str = "[[OPTIONS]]";

/// Template used when the caller does not set one.
///
/// `program` is usually the basename of `argv[0]`; without it the template is
/// just the option table.
pub fn default_template(program: Option<&str>) -> String {
    match program {
        Some(program) => format!("Usage:\n  {program} [OPTION]\nOptions:\n{OPTIONS_MARKER}"),
        None => OPTIONS_MARKER.to_string(),
    }
}

/// Basename of the running executable, if the platform reports one.
pub fn program_name() -> Option<String> {
    let argv0 = std::env::args_os().next()?;
    let path = std::path::PathBuf::from(argv0);
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn format_names(def: &OptionDef) -> String {
    match def.short() {
        Some(short) if def.is_short_only() => format!("  -{short}"),
        Some(short) => format!("  -{short}, --{}", def.definition()),
        None => format!("      --{}", def.definition()),
    }
}

fn format_row(def: &OptionDef) -> Vec<String> {
    let mut row = vec![format_names(def), format!(" {}", def.comment())];
    if let Some(default) = def.default_value() {
        row.push(format!(" (default: {default})"));
    }
    row
}

/// Render the option table: one row per option, columns padded to the widest
/// cell of the column before them, trailing whitespace trimmed.
pub fn render_table(registry: &Registry) -> String {
    let table: Vec<Vec<String>> = registry.iter().map(format_row).collect();

    let mut widths: Vec<usize> = Vec::new();
    for row in &table {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let lines: Vec<String> = table
        .iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    let pad = widths[i - 1] - row[i - 1].chars().count();
                    line.extend(std::iter::repeat_n(' ', pad));
                }
                line.push_str(cell);
            }
            line.trim_end().to_string()
        })
        .collect();

    lines.join("\n")
}

/// Substitute the option table into `template` at [`OPTIONS_MARKER`].
pub fn render(template: &str, registry: &Registry) -> String {
    template.replacen(OPTIONS_MARKER, &render_table(registry), 1)
}
