use std::path::{Path, PathBuf};

use netcdf::Extents;

use crate::config::Config;
use crate::nc_utils::NcChar;
use crate::records::N_HEADER_RECORDS;

pub(crate) const FHS_VARNAME: &str = "FPT";

/// An FHS-style file name whose observation time is `utc` (`YYYYMMDDHHmmss`).
pub(crate) fn fhs_file_name(utc: &str) -> String {
    format!("FY4A-_AGRI--_N_DISK_1047E_L2-_FHS-_MULT_NOM_{utc}_{utc}_2000M_V0001.NC")
}

/// The five metadata lines every FHS file starts with.
pub(crate) fn header_lines() -> Vec<String> {
    (0..N_HEADER_RECORDS)
        .map(|i| format!("FHS header {i}"))
        .collect()
}

/// Header lines followed by `ndata` valid, distinct detections.
pub(crate) fn fpt_lines(ndata: usize) -> Vec<String> {
    let mut lines = header_lines();
    for i in 0..ndata {
        lines.push(format!(
            "{} 1 2 {:.2} 113.25 4.0 0.5 {:.1} 1 3 440300",
            i + 1,
            23.0 + i as f64 * 0.25,
            15.0 + i as f64
        ));
    }
    lines
}

/// Write a netCDF-4 file with a 1-D string variable `FPT` holding `lines`.
pub(crate) fn write_fhs_file<S: AsRef<str>>(dir: &Path, name: &str, lines: &[S]) -> PathBuf {
    let path = dir.join(name);
    let mut ds = netcdf::create(&path).expect("Creating test netCDF file should not fail");
    ds.add_dimension("record", lines.len())
        .expect("Adding record dimension should not fail");
    let mut var = ds
        .add_string_variable(FHS_VARNAME, &["record"])
        .expect("Adding FPT variable should not fail");
    for (i, line) in lines.iter().enumerate() {
        var.put_string(line.as_ref(), [i])
            .expect("Writing FPT record should not fail");
    }
    path
}

/// Write a file with a 2-D `char` variable `FPT`, one row of `width` characters per
/// line. Each line is NUL padded to `width`.
pub(crate) fn write_fhs_char_file<S: AsRef<str>>(dir: &Path, name: &str, lines: &[S], width: usize) -> PathBuf {
    let path = dir.join(name);
    let mut chars = Vec::with_capacity(lines.len() * width);
    for line in lines {
        let bytes = line.as_ref().as_bytes();
        assert!(bytes.len() <= width, "test record longer than char dimension");
        chars.extend(bytes.iter().map(|&b| NcChar(b)));
        chars.extend(std::iter::repeat(NcChar(0)).take(width - bytes.len()));
    }

    let mut ds = netcdf::create(&path).expect("Creating test netCDF file should not fail");
    ds.add_dimension("record", lines.len())
        .expect("Adding record dimension should not fail");
    ds.add_dimension("record_len", width)
        .expect("Adding record length dimension should not fail");
    let mut var = ds
        .add_variable::<NcChar>(FHS_VARNAME, &["record", "record_len"])
        .expect("Adding FPT variable should not fail");
    var.put_values(&chars, Extents::All)
        .expect("Writing FPT records should not fail");
    path
}

/// A configuration reading from `src` and writing to `out` with prefix `FHS`.
pub(crate) fn test_config(src: &Path, out: &Path) -> Config {
    let toml = format!(
        "[path]\nsrc = {:?}\nout = {:?}\n\n[str]\nprefix = \"FHS\"\n",
        src.display().to_string(),
        out.display().to_string()
    );
    Config::from_toml_str(&toml).expect("Test configuration should parse")
}

/// Read a whole output file as text, for byte-for-byte comparisons.
pub(crate) fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Reading output file should not fail")
}
