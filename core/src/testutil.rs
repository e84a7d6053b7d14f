//! Shared fixtures for unit tests.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Hand-checkable four-state model over the runes 甲/乙/丙: 甲 wants B,
/// 乙 wants E, 丙 wants S; transitions effectively allow B->E/B->M,
/// E->B/E->S, M->E/M->M, S->S/S->B.
pub const TOY_MODEL: &str = "\
# toy four-state model
-1 -100 -100 -2
-100 -1 -2 -100
-1 -100 -100 -2
-100 -1 -2 -100
-2 -100 -100 -1
甲:-1,乙:-10,丙:-10
甲:-10,乙:-1,丙:-10
甲:-10,乙:-5,丙:-10
甲:-5,乙:-10,丙:-1
";

/// Small base dictionary with easily hand-computed ln(freq/100) weights.
pub const BASE_DICT: &str = "\
南京市 30 ns
南京 20 ns
市长 10 n
长江 20 ns
大桥 15 ns
江大桥 5 nz
";

pub fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}
