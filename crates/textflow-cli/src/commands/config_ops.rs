use std::fs;
use std::process;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", textflow_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        textflow_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: hyphenation.min_word_length={}, margins={}/{}, language.default={}, supported={}",
        s.hyphenation.min_word_length,
        s.hyphenation.min_left_chars,
        s.hyphenation.min_right_chars,
        s.language.default,
        s.language.supported.join(",")
    );
}
