use yurt_scene::Settings;

fn main() -> anyhow::Result<()> {
    yurt_scene::run(Settings::from_env())
}
