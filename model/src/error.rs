use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
pub struct Error(OpaqueError);
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum OpaqueError {
    #[snafu(display("Unable to read bootstrap descriptor '{}': {}", path.display(), source))]
    DescriptorRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to parse bootstrap descriptor '{}': {}", path.display(), source))]
    DescriptorParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display("Error serializing bootstrap descriptor: {}", source))]
    DescriptorSerialize { source: serde_yaml::Error },

    #[snafu(display("Unable to write bootstrap descriptor '{}': {}", path.display(), source))]
    DescriptorWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to read manifest template '{}': {}", path.display(), source))]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Rendered manifest '{}' is not valid YAML: {}", name, source))]
    ManifestParse {
        name: String,
        source: serde_yaml::Error,
    },

    #[snafu(display("Rendered manifest '{}' could not be converted to JSON: {}", name, source))]
    ManifestConvert {
        name: String,
        source: serde_json::Error,
    },

    #[snafu(display("Rendered manifest '{}' is not a mapping", name))]
    ManifestShape { name: String },

    #[snafu(display("Invalid placeholder pattern: {}", source))]
    PlaceholderPattern { source: regex::Error },
}
