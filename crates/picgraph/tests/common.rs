use std::fs;
use std::path::{Path, PathBuf};

use picgraph::AnalysisOptions;
use tempfile::TempDir;

/// Small firmware image exercising every control transfer kind.
///
/// - 0x0004 is the interrupt vector slot holding 0x0300
/// - 0x0100 holds the string "Hi!"
/// - main (0x0200) calls 0x0210 and delay (0x0220), branches around the call
/// - delay ends in an indirect call
pub const FIRMWARE: &str = "\
Disassembly of section .text:

0x0000: 0x00040200 goto 0x200
0x0002: 0x00000000 nop
0x0004: 0x00000300 nop  ; isr vector
0x0100: 0x00006948 nop
0x0102: 0x00000021 nop

main:
0x0200: 0x00070007 rcall 0x210
0x0202: 0x00320002 bra z, 0x208
0x0204: 0x00020220 call 0x220
0x0206: 0x00000000 nop
0x0208: 0x00060000 return
0x0210: 0x20810000 mov #0x8100, w0  ; load \"Hi!\"
0x0212: 0x00060000 return
0x0220: 0x00010003 call w3
0x0222: 0x00060000 return
0x0300: 0x00000000 nop
0x0302: 0x00060000 return
";

pub const ALIASES: &str = "0x0200,main\n\n0x0220, delay\n";
pub const VECTORS: &str = "0x0004,isr\n";

/// Input files written into a temporary directory.
pub struct Fixture {
    pub dir: TempDir,
    pub listing: PathBuf,
    pub aliases: PathBuf,
    pub vectors: PathBuf,
}

impl Fixture {
    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions::new()
            .with_aliases(&self.aliases)
            .with_vectors(&self.vectors)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let listing = write_file(dir.path(), "firmware.lst", FIRMWARE);
    let aliases = write_file(dir.path(), "aliases.csv", ALIASES);
    let vectors = write_file(dir.path(), "vectors.csv", VECTORS);
    Fixture {
        dir,
        listing,
        aliases,
        vectors,
    }
}
