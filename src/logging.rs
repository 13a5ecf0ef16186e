use env_logger::{Builder, Env};
use log::{Level, LevelFilter};
use std::fmt::Arguments;
use std::io::{self, Write};
use termcolor::{Ansi, Color, ColorSpec, WriteColor};

/// Colored `[LEVEL][module] message` lines on stderr. `RUST_LOG` overrides
/// the default `pixelsynth=info`; camera and HTTP crates stay at warn.
pub fn init_logger() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("pixelsynth=info"));
    builder.filter_module("nokhwa", LevelFilter::Warn);
    builder.filter_module("reqwest", LevelFilter::Warn);

    // env_logger strips the escapes again when stderr is not a terminal.
    builder.format(|buf, record| {
        let module = record.module_path().unwrap_or("<unknown>");
        write_record(&mut Ansi::new(buf), record.level(), module, record.args())
    });

    let _ = builder.try_init();
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Trace => Color::Cyan,
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    }
}

fn write_record(
    out: &mut impl WriteColor,
    level: Level,
    module: &str,
    args: &Arguments<'_>,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(level_color(level))))?;
    write!(out, "[{level}][{module}]")?;
    out.reset()?;
    writeln!(out, " {args}")
}
