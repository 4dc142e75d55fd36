use std::env;
use std::path::PathBuf;

// ffmpeg-sys-next does its own discovery; this only points Windows users at
// the usual vcpkg layout when FFMPEG_DIR is missing.
fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows")
        || env::var_os("FFMPEG_DIR").is_some()
    {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=FFMPEG_DIR is not set. Install FFmpeg (e.g. via vcpkg) and set FFMPEG_DIR before building timelapse."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let candidate = PathBuf::from(vcpkg_root).join("installed").join(triplet);
    if candidate.exists() {
        println!(
            "cargo:warning=Found vcpkg FFmpeg at {0}; set FFMPEG_DIR={0} to use it.",
            candidate.display(),
        );
    } else {
        println!(
            "cargo:warning=No vcpkg FFmpeg install at {}.",
            candidate.display(),
        );
    }
}
