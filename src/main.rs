use clap::Parser;
use docx_cjk_font::FontName;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docx-cjk-font",
    about = "Apply an East Asian font to all CJK text in a DOCX file"
)]
struct Args {
    /// Input DOCX file
    input: PathBuf,
    /// Output DOCX file (defaults to <input_stem>_modified.docx)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// East Asian font name (defaults to $DOCX_CJK_FONT, then FangSong)
    #[arg(short, long)]
    font: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: file not found: {}", args.input.display());
        std::process::exit(1);
    }
    let is_docx = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
    if !args.input.is_file() || !is_docx {
        eprintln!("Error: input must be a .docx file, got: {}", args.input.display());
        std::process::exit(1);
    }

    let font = match FontName::resolve_with_env(args.font.as_deref()) {
        Ok(font) => font,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let output = args.output.unwrap_or_else(|| {
        let stem = args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        args.input.with_file_name(format!("{stem}_modified.docx"))
    });

    println!("Opening:  {}", args.input.display());
    match docx_cjk_font::convert_file(&args.input, &output, &font) {
        Ok(modified) => {
            println!("Saved:    {}", output.display());
            println!("Runs modified: {modified}  (font: {font})");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
