//! get, get-published and list

use super::{print_json, Env};
use clap::Args;
use pubsync_core::errors::Result;
use pubsync_engine::DEFAULT_PAGE_SIZE;

#[derive(Debug, Args)]
pub struct GetArgs {
    #[arg(long)]
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub author: i64,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,
}

pub fn get(env: &Env, args: GetArgs) -> Result<()> {
    let item = env.service().get_by_id(&env.context(), args.id)?;
    print_json(&item)
}

pub fn get_published(env: &Env, args: GetArgs) -> Result<()> {
    let item = env.service().get_published_by_id(&env.context(), args.id)?;
    print_json(&item)
}

pub fn list(env: &Env, args: ListArgs) -> Result<()> {
    let items = env
        .service()
        .list(&env.context(), args.author, args.offset, args.limit)?;
    print_json(&items)
}
