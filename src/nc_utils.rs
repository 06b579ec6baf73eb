use std::path::Path;

use error_stack::ResultExt;
use itertools::Itertools;
use netcdf::{
    types::{NcTypeDescriptor, NcVariableType},
    Extents,
};

use crate::error::NcReadError;

/// Read a variable of text records from a netCDF file.
///
/// Two layouts are accepted: a 1-D netCDF-4 `string` variable, one record per
/// element, or a 2-D `char` variable, one record per row with trailing NUL and
/// space padding removed.
///
/// The file is opened and closed within this call; the handle is dropped on
/// every return path, including errors.
pub fn read_text_records(path: &Path, varname: &str) -> error_stack::Result<Vec<String>, NcReadError> {
    let ds = netcdf::open(path).change_context_lazy(|| NcReadError::Open(path.to_path_buf()))?;
    let var = ds
        .variable(varname)
        .ok_or_else(|| NcReadError::MissingVariable(varname.to_string()))?;

    match var.vartype() {
        NcVariableType::String => read_string_records(&var, varname),
        NcVariableType::Char => read_char_records(&var, varname),
        other => Err(NcReadError::UnsupportedType {
            varname: varname.to_string(),
            vartype: format!("{other:?}"),
        }
        .into()),
    }
}

fn read_string_records(var: &netcdf::Variable, varname: &str) -> error_stack::Result<Vec<String>, NcReadError> {
    let dims = var.dimensions();
    if dims.len() != 1 {
        return Err(NcReadError::UnsupportedType {
            varname: varname.to_string(),
            vartype: format!("{}-D string", dims.len()),
        }
        .into());
    }

    let n = dims[0].len();
    let mut records = Vec::with_capacity(n);
    for i in 0..n {
        let s = var
            .get_string([i])
            .change_context_lazy(|| NcReadError::Read(varname.to_string()))
            .attach_printable_lazy(|| format!("at record {i}"))?;
        records.push(s);
    }
    Ok(records)
}

fn read_char_records(var: &netcdf::Variable, varname: &str) -> error_stack::Result<Vec<String>, NcReadError> {
    let dims = var.dimensions();
    if dims.len() != 2 {
        return Err(NcReadError::UnsupportedType {
            varname: varname.to_string(),
            vartype: format!("{}-D char", dims.len()),
        }
        .into());
    }
    let (nrec, width) = (dims[0].len(), dims[1].len());

    let chars = var
        .get_values::<NcChar, _>(Extents::All)
        .change_context_lazy(|| NcReadError::Read(varname.to_string()))?;
    if width == 0 {
        return Ok(vec![String::new(); nrec]);
    }

    let records = chars
        .chunks(width)
        .map(|row| {
            let bytes = row.iter().map(|c| c.0).collect_vec();
            String::from_utf8_lossy(&bytes)
                .trim_end_matches(['\0', ' '])
                .to_string()
        })
        .collect();
    Ok(records)
}

/// A netCDF `char` element. netCDF will not convert `char` to `u8`, so
/// character arrays must be read through a type that reports itself as `char`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NcChar(pub u8);

unsafe impl NcTypeDescriptor for NcChar {
    fn type_descriptor() -> NcVariableType {
        NcVariableType::Char
    }
}
