use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Number of entries in each gamma lookup table.
const LUT_SIZE: usize = 4096;

/// IEC 61966-2-1 decode: sRGB to linear
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// IEC 61966-2-1 encode: linear to sRGB
fn linear_to_srgb_exact(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

fn write_table(out: &mut impl Write, name: &str, doc: &str, f: fn(f64) -> f64) -> io::Result<()> {
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub static {name}: [f32; {LUT_SIZE}] = [")?;
    let max = (LUT_SIZE - 1) as f64;
    for i in 0..LUT_SIZE {
        if i > 0 && i % 8 == 0 {
            writeln!(out)?;
        }
        write!(out, "    {:.9},", f(i as f64 / max) as f32)?;
    }
    writeln!(out, "\n];\n")
}

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let mut file = File::create(Path::new(&out_dir).join("gamma_lut.rs"))?;

    write_table(
        &mut file,
        "SRGB_TO_LINEAR",
        "sRGB (index / 4095) to linear light",
        srgb_to_linear_exact,
    )?;
    write_table(
        &mut file,
        "LINEAR_TO_SRGB",
        "Linear light (index / 4095) to sRGB",
        linear_to_srgb_exact,
    )?;

    println!("cargo::rerun-if-changed=build.rs");
    Ok(())
}
