use chrono::Utc;

use crate::{
    SlugArgs,
    build::{Locales, annotate::annotate, document::ContentItem, document::FrontMatter},
};

pub fn run(args: &SlugArgs) -> Result<(), anyhow::Error> {
    let locales = Locales::new(args.default_locale.clone(), args.locales.iter().cloned());
    let item = ContentItem::new(
        args.collection.clone(),
        args.path.as_str(),
        FrontMatter::default(),
    );

    let Some(node) = annotate(item, &locales, Utc::now()) else {
        return Err(anyhow::anyhow!(
            "No page for {path} in collection '{collection}'",
            path = args.path,
            collection = args.collection
        ));
    };

    println!("{}", serde_json::to_string_pretty(&node.fields)?);
    println!("Mounted at {}", node.page_path(locales.default_locale()));

    Ok(())
}
