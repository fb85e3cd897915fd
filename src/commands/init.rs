use crate::{
    InitArgs,
    config::{
        BlogConfig, DEFAULT_CONFIG_FILE, LocaleConfig, QueryConfig, RootConfig, SiteConfig,
        SourceConfig, TemplateConfig,
    },
};

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    let config_file = path.join(DEFAULT_CONFIG_FILE);
    if config_file.exists() {
        return Err(anyhow::anyhow!(
            "Config file already exists: {config_file}",
            config_file = config_file.display()
        ));
    }

    println!("Initializing project in {}", path.display());

    let config_text = serde_yaml::to_string(&starter_config())?;
    tokio::fs::write(&config_file, config_text).await?;

    println!(
        "Created config file {config_file}",
        config_file = config_file.display()
    );

    Ok(())
}

fn starter_config() -> RootConfig {
    RootConfig {
        site: SiteConfig {
            name: "My Site".into(),
            url: Some("https://example.com".into()),
            output: "_site".into(),
            manifest: "pages.json".into(),
        },
        sources: vec![
            SourceConfig {
                name: "docs".into(),
                path: "docs".into(),
                nav: None,
            },
            SourceConfig {
                name: "packages".into(),
                path: "packages".into(),
                nav: None,
            },
        ],
        locales: LocaleConfig::default(),
        blog: BlogConfig::default(),
        templates: TemplateConfig::default(),
        query: QueryConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            path: dir.path().join("site"),
            create: true,
        };

        run(&args).await.unwrap();

        let config = RootConfig::load_from_file(&args.path.join(DEFAULT_CONFIG_FILE))
            .await
            .unwrap();
        assert_eq!(config.site.name, "My Site");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.blog.posts_per_page, 8);

        // A second run must not clobber the file
        assert!(run(&args).await.is_err());
    }

    #[tokio::test]
    async fn test_init_requires_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            path: dir.path().join("missing"),
            create: false,
        };
        assert!(run(&args).await.is_err());
    }
}
