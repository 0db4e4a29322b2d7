use anyhow::Context;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let mut args = std::env::args().skip(1);
    let font = args
        .next()
        .context("usage: render_png <font.ttf> [text] [out.png]")?;
    let text = args.next().unwrap_or_else(|| "x7gT".to_string());
    let out = args.next().unwrap_or_else(|| "captcha.png".to_string());

    let config = captcha3d::Config::new(400, 200, 25f32, font);
    let captcha = captcha3d::Captcha3d::new(text, config)?;
    captcha.save(&out)?;
    println!("wrote {out}");
    Ok(())
}
