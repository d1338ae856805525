use std::path::Path;

/// Extension (with dot, lowercase) to fence language tag.
const LANGUAGE_MAP: &[(&str, &str)] = &[
    (".py", "python"),
    (".js", "javascript"),
    (".html", "html"),
    (".css", "css"),
    (".java", "java"),
    (".c", "c"),
    (".cpp", "cpp"),
    (".h", "cpp"),
    (".cs", "csharp"),
    (".php", "php"),
    (".rb", "ruby"),
    (".go", "go"),
    (".ts", "typescript"),
    (".sh", "bash"),
    (".bat", "batch"),
    (".ps1", "powershell"),
    (".sql", "sql"),
    (".json", "json"),
    (".xml", "xml"),
    (".yaml", "yaml"),
    (".yml", "yaml"),
    (".md", "markdown"),
    (".txt", "text"),
    (".csv", "csv"),
];

/// Language tag for a file, looked up by its extension ignoring case.
pub fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    LANGUAGE_MAP
        .iter()
        .find(|(known, _)| known[1..] == ext)
        .map(|&(_, tag)| tag)
}
