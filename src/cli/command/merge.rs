use std::path::Path;

use anyhow::Result;

use crate::{cli::Dataset, layout, merge::merge_dir};

pub fn merge(dataset: Dataset, data_dir: &Path) -> Result<String> {
    let (input, output) = match dataset {
        Dataset::Weather => (layout::WEATHER_DIR, layout::MERGED_WEATHER),
        Dataset::Marine => (layout::MARINE_DIR, layout::MERGED_MARINE),
    };
    let output = data_dir.join(output);

    let summary = merge_dir(&data_dir.join(input), &output)?;

    Ok(format!(
        "Merged {} file(s), {} row(s), {} column(s) into `{}`",
        summary.files,
        summary.rows,
        summary.columns,
        output.display()
    ))
}
