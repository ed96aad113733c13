use std::sync::Arc;

use scheduler::Scheduler;
use store::database::RedisStore;

use super::config::Config;

pub struct State {
    pub config: Config,
    pub store: Arc<RedisStore>,
    pub scheduler: Arc<Scheduler<RedisStore>>,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store = Arc::new(RedisStore::connect(&config.redis_url).await);
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&store),
            config.scheduler_interval,
        ));

        Arc::new(Self {
            config,
            store,
            scheduler,
        })
    }
}
