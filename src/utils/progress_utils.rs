use tracing_indicatif::style::ProgressStyle;

const TEMPLATE: &str = "[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";

/// Bar style for spans that report progress through `tracing-indicatif`.
pub fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
