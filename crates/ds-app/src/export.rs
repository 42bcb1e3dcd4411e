//! CSV export of run results.

use std::io::Write;
use std::path::Path;

use ds_core::rad_to_deg;

use crate::error::{AppError, AppResult};
use crate::run_service::RunResult;

/// Write `result` as CSV to `path`.
pub fn write_csv(path: &Path, result: &RunResult) -> AppResult<()> {
    let file = std::fs::File::create(path).map_err(|e| AppError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    write_csv_to(&mut writer, result)?;
    writer.flush()?;
    Ok(())
}

/// Write `result` as CSV: one row per output time, angles in degrees.
///
/// Columns are `t_s, alpha_deg, cl_static`, then for each model
/// `<model>_cl`, `<model>_cd` (when the model provides drag), `<model>_f`
/// and `<model>_alpha_e_deg`.
pub fn write_csv_to<W: Write>(writer: &mut W, result: &RunResult) -> AppResult<()> {
    let mut header = vec![
        "t_s".to_string(),
        "alpha_deg".to_string(),
        "cl_static".to_string(),
    ];
    for s in &result.series {
        header.push(format!("{}_cl", s.model));
        if s.cd.is_some() {
            header.push(format!("{}_cd", s.model));
        }
        header.push(format!("{}_f", s.model));
        header.push(format!("{}_alpha_e_deg", s.model));
    }
    writeln!(writer, "{}", header.join(","))?;

    for i in 0..result.t.len() {
        let mut row = vec![
            result.t[i],
            rad_to_deg(result.alpha[i]),
            result.cl_static[i],
        ];
        for s in &result.series {
            row.push(s.cl[i]);
            if let Some(cd) = &s.cd {
                row.push(cd[i]);
            }
            row.push(s.separation[i]);
            row.push(rad_to_deg(s.alpha_effective[i]));
        }
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", line.join(","))?;
    }
    Ok(())
}
