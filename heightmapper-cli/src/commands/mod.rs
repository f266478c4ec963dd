pub mod download;
pub mod plan;

/// Print run information, keeping stdout free when the artifact goes there.
fn announce(text: &str, artifact_on_stdout: bool) {
    if artifact_on_stdout {
        eprint!("{}", text);
    } else {
        print!("{}", text);
    }
}
