#![allow(dead_code)]

use page_interactions::{Page, Result};

pub const LANDING_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>Acme Studio</title></head>
<body>
  <nav id="navbar" class="navbar">
    <div class="nav-container">
      <a class="logo" href="#home">Acme</a>
      <ul id="nav-menu" class="nav-menu">
        <li><a class="nav-link" href="#home">Home</a></li>
        <li><a class="nav-link" href="#services">Services</a></li>
        <li><a class="nav-link" href="#contact">Contact</a></li>
      </ul>
      <button id="hamburger" class="hamburger"><span class="bar"></span></button>
    </div>
  </nav>

  <section id="home" class="hero">
    <div class="hero-background"></div>
    <h1 id="hero-title" class="fade-in">Build better products</h1>
    <p id="slogan" class="hero-slogan fade-in">Ship it</p>
    <div id="hero-buttons" class="hero-buttons fade-in">
      <a id="cta" href="#contact" class="btn btn-primary"> Get Started </a>
      <a id="learn" href="#services" class="btn btn-secondary">Learn More</a>
    </div>
  </section>

  <section id="services">
    <div id="card-web" class="service-card fade-in-up" data-delay="100"><h3>Web Development</h3></div>
    <div id="card-cloud" class="service-card fade-in-up" data-delay="200"><h3>Cloud Hosting</h3></div>
    <div id="card-plain" class="service-card fade-in-left"><p>Ask us anything</p></div>
    <img id="diagram" class="lazy" data-src="/img/diagram.png" alt="Architecture diagram">
  </section>

  <section id="contact">
    <form class="contact-form" action="/send" method="post">
      <div class="form-group"><input id="name" name="name" type="text" required></div>
      <div class="form-group"><input id="email" name="email" type="email" required></div>
      <div class="form-group"><input id="phone" name="phone" type="tel"></div>
      <div class="form-group"><textarea id="message" name="message" required></textarea></div>
      <button id="send" type="submit">Send Message</button>
    </form>
  </section>

  <button id="scrollToTop" class="scroll-to-top">Top</button>
</body>
</html>
"##;

pub const NAVBAR_HEIGHT: f64 = 70.0;

/// Builds the landing page with a deterministic layout:
/// home `[0, 800)`, services `[800, 1700)`, contact `[1700, 2400)`.
pub fn landing_page() -> Result<Page> {
    let mut page = Page::from_html(LANDING_PAGE)?;
    page.set_layout("#navbar", 0.0, NAVBAR_HEIGHT)?;
    page.set_layout("#home", 0.0, 800.0)?;
    page.set_layout("#services", 800.0, 900.0)?;
    page.set_layout("#card-web", 900.0, 300.0)?;
    page.set_layout("#card-cloud", 1250.0, 300.0)?;
    page.set_layout("#card-plain", 1600.0, 100.0)?;
    page.set_layout("#diagram", 1500.0, 200.0)?;
    page.set_layout("#contact", 1700.0, 700.0)?;
    Ok(page)
}
