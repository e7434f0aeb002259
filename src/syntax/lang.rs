use std::path::Path;

/// Extension → language id. Ids are names syntect can resolve by token.
const EXTENSIONS: &[(&str, &str)] = &[
    ("rs", "rust"),
    ("ts", "typescript"),
    ("tsx", "typescriptreact"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("jsx", "javascript"),
    ("json", "json"),
    ("py", "python"),
    ("rb", "ruby"),
    ("go", "go"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("swift", "swift"),
    ("c", "c"),
    ("h", "c"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("cs", "cs"),
    ("php", "php"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "bash"),
    ("toml", "toml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("sql", "sql"),
    ("lua", "lua"),
    ("xml", "xml"),
    ("diff", "diff"),
    ("patch", "diff"),
];

/// Whole file names that carry no useful extension
const FILE_NAMES: &[(&str, &str)] = &[
    ("Makefile", "makefile"),
    ("Dockerfile", "dockerfile"),
    ("Cargo.lock", "toml"),
    ("CMakeLists.txt", "cmake"),
];

/// Guess a language id from a file path. Unknown files are `"text"`.
pub fn language_for_path(path: &str) -> &'static str {
    let path = Path::new(path);

    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if let Some((_, lang)) = FILE_NAMES.iter().find(|(n, _)| *n == name) {
            return lang;
        }
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .and_then(|ext| EXTENSIONS.iter().find(|(e, _)| *e == ext).map(|(_, lang)| *lang))
        .unwrap_or("text")
}
