use crate::{
    BuildArgs,
    build::{Builder, base_path_from_config},
    config::{DEFAULT_CONFIG_FILE, RootConfig},
};

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    // Determine the config file path
    let config_path = args
        .config_file
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());
    let config_path = if config_path.is_relative() {
        std::env::current_dir()?.join(&config_path)
    } else {
        config_path
    };

    let config = RootConfig::load_from_arg(Some(config_path.as_path())).await?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    let mut builder = Builder::new(config, base_path);
    if let Some(now) = args.now {
        builder = builder.with_now(now);
    }
    let result = builder.build().await?;

    println!(
        "Built {} page(s) to {} ({} blog list, {} post, {} tag, {} doc)",
        result.counts.total(),
        result.manifest_path.display(),
        result.counts.blog_lists,
        result.counts.blog_posts,
        result.counts.blog_tags,
        result.counts.docs,
    );
    println!("Output directory: {}", result.output_dir.display());

    Ok(())
}
