//! Dependency catalogs.
//!
//! Each catalog maps package names to a display label. Order is significant:
//! the first matching entry wins wherever a single label is reported.
//! A pattern ending in `*` matches by prefix (`@radix-ui/*`).

use std::collections::BTreeMap;

pub(crate) type Deps = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub pattern: &'static str,
    pub label: &'static str,
}

const fn e(pattern: &'static str, label: &'static str) -> Entry {
    Entry { pattern, label }
}

fn entry_matches(entry: &Entry, deps: &Deps) -> bool {
    match entry.pattern.strip_suffix('*') {
        Some(prefix) => deps
            .range(prefix.to_string()..)
            .next()
            .is_some_and(|(name, _)| name.starts_with(prefix)),
        None => deps.contains_key(entry.pattern),
    }
}

/// First label (catalog order) whose pattern is present.
pub(crate) fn first_label(catalog: &[Entry], deps: &Deps) -> Option<&'static str> {
    catalog
        .iter()
        .find(|entry| entry_matches(entry, deps))
        .map(|entry| entry.label)
}

/// Every distinct label present, in catalog order.
pub(crate) fn labels(catalog: &[Entry], deps: &Deps) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for entry in catalog {
        if entry_matches(entry, deps) && !out.contains(&entry.label) {
            out.push(entry.label);
        }
    }
    out
}

pub(crate) fn any(catalog: &[Entry], deps: &Deps) -> bool {
    catalog.iter().any(|entry| entry_matches(entry, deps))
}

/// The matched dependency's name, for version lookup.
pub(crate) fn matched_name<'a>(catalog: &[Entry], label: &str, deps: &'a Deps) -> Option<&'a str> {
    catalog
        .iter()
        .filter(|entry| entry.label == label)
        .find_map(|entry| match entry.pattern.strip_suffix('*') {
            Some(prefix) => deps
                .keys()
                .find(|name| name.starts_with(prefix))
                .map(String::as_str),
            None => deps.get_key_value(entry.pattern).map(|(k, _)| k.as_str()),
        })
}

// Meta-frameworks in precedence order.
pub(crate) const FRONTEND_FRAMEWORKS: &[Entry] = &[
    e("next", "Next.js"),
    e("nuxt", "Nuxt"),
    e("nuxt3", "Nuxt"),
    e("@sveltejs/kit", "SvelteKit"),
    e("@remix-run/react", "Remix"),
    e("@remix-run/node", "Remix"),
    e("gatsby", "Gatsby"),
    e("astro", "Astro"),
    e("@angular/core", "Angular"),
];

// Plain view layers, ranked below meta and docs frameworks.
pub(crate) const VIEW_LIBRARIES: &[Entry] = &[
    e("vue", "Vue"),
    e("svelte", "Svelte"),
    e("solid-js", "SolidJS"),
    e("preact", "Preact"),
    e("react", "React"),
];

pub(crate) const SERVER_FRAMEWORKS: &[Entry] = &[
    e("@nestjs/core", "NestJS"),
    e("express", "Express"),
    e("fastify", "Fastify"),
    e("koa", "Koa"),
    e("hono", "Hono"),
    e("@hapi/hapi", "hapi"),
    e("django", "Django"),
    e("flask", "Flask"),
    e("fastapi", "FastAPI"),
    e("rails", "Rails"),
    e("sinatra", "Sinatra"),
    e("laravel/framework", "Laravel"),
    e("axum", "Axum"),
    e("actix-web", "Actix Web"),
    e("rocket", "Rocket"),
    e("warp", "warp"),
    e("github.com/gin-gonic/gin", "Gin"),
    e("github.com/labstack/echo/v4", "Echo"),
    e("github.com/gofiber/fiber/v2", "Fiber"),
];

pub(crate) const DOCS_FRAMEWORKS: &[Entry] = &[
    e("@docusaurus/core", "Docusaurus"),
    e("vitepress", "VitePress"),
    e("nextra", "Nextra"),
    e("nextra-theme-docs", "Nextra"),
    e("@astrojs/starlight", "Starlight"),
    e("vuepress", "VuePress"),
    e("docsify", "Docsify"),
    e("docsify-cli", "Docsify"),
    e("mkdocs", "MkDocs"),
    e("mkdocs-material", "MkDocs"),
];

pub(crate) const AUTH_LIBRARIES: &[Entry] = &[
    e("next-auth", "NextAuth.js"),
    e("@auth/core", "Auth.js"),
    e("@clerk/*", "Clerk"),
    e("@supabase/auth-helpers-nextjs", "Supabase Auth"),
    e("@supabase/auth-ui-react", "Supabase Auth"),
    e("@supabase/ssr", "Supabase Auth"),
    e("@auth0/*", "Auth0"),
    e("@kinde-oss/*", "Kinde"),
    e("@okta/*", "Okta"),
    e("lucia", "Lucia"),
    e("better-auth", "Better Auth"),
    e("firebase-auth", "Firebase Auth"),
    e("passport", "Passport"),
    e("django-allauth", "django-allauth"),
    e("flask-login", "Flask-Login"),
    e("devise", "Devise"),
    e("jsonwebtoken", "JWT"),
];

pub(crate) const DATABASES: &[Entry] = &[
    e("pg", "PostgreSQL"),
    e("postgres", "PostgreSQL"),
    e("@neondatabase/serverless", "PostgreSQL"),
    e("@vercel/postgres", "PostgreSQL"),
    e("psycopg2", "PostgreSQL"),
    e("psycopg2-binary", "PostgreSQL"),
    e("psycopg", "PostgreSQL"),
    e("tokio-postgres", "PostgreSQL"),
    e("github.com/jackc/pgx/v5", "PostgreSQL"),
    e("github.com/lib/pq", "PostgreSQL"),
    e("mysql2", "MySQL"),
    e("mysql", "MySQL"),
    e("@planetscale/database", "MySQL"),
    e("mongodb", "MongoDB"),
    e("mongoose", "MongoDB"),
    e("pymongo", "MongoDB"),
    e("sqlite3", "SQLite"),
    e("better-sqlite3", "SQLite"),
    e("rusqlite", "SQLite"),
    e("@libsql/client", "SQLite"),
    e("@supabase/supabase-js", "Supabase"),
    e("firebase", "Firebase"),
    e("firebase-admin", "Firebase"),
    e("redis", "Redis"),
    e("ioredis", "Redis"),
    e("@upstash/redis", "Redis"),
];

pub(crate) const ORMS: &[Entry] = &[
    e("@prisma/client", "Prisma"),
    e("prisma", "Prisma"),
    e("drizzle-orm", "Drizzle"),
    e("typeorm", "TypeORM"),
    e("sequelize", "Sequelize"),
    e("mongoose", "Mongoose"),
    e("@mikro-orm/core", "MikroORM"),
    e("kysely", "Kysely"),
    e("sqlalchemy", "SQLAlchemy"),
    e("diesel", "Diesel"),
    e("sea-orm", "SeaORM"),
    e("sqlx", "SQLx"),
    e("gorm.io/gorm", "GORM"),
    e("activerecord", "Active Record"),
];

pub(crate) const STATE_LIBRARIES: &[Entry] = &[
    e("@reduxjs/toolkit", "Redux"),
    e("redux", "Redux"),
    e("react-redux", "Redux"),
    e("zustand", "Zustand"),
    e("jotai", "Jotai"),
    e("recoil", "Recoil"),
    e("mobx", "MobX"),
    e("mobx-react-lite", "MobX"),
    e("pinia", "Pinia"),
    e("vuex", "Vuex"),
    e("@tanstack/react-query", "TanStack Query"),
    e("react-query", "TanStack Query"),
    e("xstate", "XState"),
    e("valtio", "Valtio"),
    e("@ngrx/store", "NgRx"),
];

pub(crate) const STYLING: &[Entry] = &[
    e("tailwindcss", "Tailwind CSS"),
    e("sass", "Sass"),
    e("node-sass", "Sass"),
    e("styled-components", "styled-components"),
    e("@emotion/react", "Emotion"),
    e("@emotion/styled", "Emotion"),
    e("@vanilla-extract/css", "vanilla-extract"),
];

pub(crate) const UI_LIBRARIES: &[Entry] = &[
    e("@mui/material", "Material UI"),
    e("@material-ui/core", "Material UI"),
    e("@chakra-ui/react", "Chakra UI"),
    e("@radix-ui/*", "Radix UI"),
    e("bootstrap", "Bootstrap"),
    e("react-bootstrap", "Bootstrap"),
    e("@headlessui/react", "Headless UI"),
    e("@mantine/core", "Mantine"),
    e("antd", "Ant Design"),
];

pub(crate) const ANIMATION: &[Entry] = &[
    e("framer-motion", "Framer Motion"),
    e("motion", "Framer Motion"),
    e("gsap", "GSAP"),
    e("lottie-react", "Lottie"),
    e("@react-spring/web", "React Spring"),
];

pub(crate) const CMS: &[Entry] = &[
    e("contentful", "Contentful"),
    e("@sanity/client", "Sanity"),
    e("next-sanity", "Sanity"),
    e("sanity", "Sanity"),
    e("@strapi/strapi", "Strapi"),
    e("@prismicio/client", "Prismic"),
    e("contentlayer", "Contentlayer"),
    e("next-contentlayer", "Contentlayer"),
    e("@tryghost/content-api", "Ghost"),
    e("@storyblok/react", "Storyblok"),
    e("storyblok-js-client", "Storyblok"),
    e("@notionhq/client", "Notion"),
    e("tinacms", "TinaCMS"),
    e("payload", "Payload"),
    e("@payloadcms/*", "Payload"),
    e("decap-cms", "Decap CMS"),
    e("netlify-cms", "Decap CMS"),
    e("@builder.io/react", "Builder.io"),
    e("@keystatic/core", "Keystatic"),
    e("wagtail", "Wagtail"),
];

pub(crate) const PAYMENTS: &[Entry] = &[
    e("stripe", "Stripe"),
    e("@stripe/*", "Stripe"),
    e("@paypal/*", "PayPal"),
    e("@paddle/paddle-js", "Paddle"),
    e("@lemonsqueezy/lemonsqueezy.js", "Lemon Squeezy"),
    e("@shopify/*", "Shopify"),
    e("shopify-buy", "Shopify"),
    e("@medusajs/*", "Medusa"),
    e("braintree", "Braintree"),
    e("razorpay", "Razorpay"),
    e("square", "Square"),
];

pub(crate) const ANALYTICS: &[Entry] = &[
    e("@vercel/analytics", "Vercel Analytics"),
    e("react-ga4", "Google Analytics"),
    e("react-ga", "Google Analytics"),
    e("@next/third-parties", "Google Analytics"),
    e("posthog-js", "PostHog"),
    e("next-plausible", "Plausible"),
    e("plausible-tracker", "Plausible"),
    e("@segment/analytics-next", "Segment"),
    e("mixpanel-browser", "Mixpanel"),
    e("@amplitude/analytics-browser", "Amplitude"),
];

pub(crate) const EMAIL: &[Entry] = &[
    e("nodemailer", "Nodemailer"),
    e("resend", "Resend"),
    e("@sendgrid/mail", "SendGrid"),
    e("postmark", "Postmark"),
    e("@react-email/components", "React Email"),
    e("mailgun.js", "Mailgun"),
    e("@aws-sdk/client-ses", "Amazon SES"),
];

pub(crate) const NEWSLETTER: &[Entry] = &[
    e("@mailchimp/mailchimp_marketing", "Mailchimp"),
    e("convertkit-api", "ConvertKit"),
    e("@beehiiv/sdk", "beehiiv"),
];

pub(crate) const REALTIME: &[Entry] = &[
    e("socket.io", "Socket.IO"),
    e("socket.io-client", "Socket.IO"),
    e("ws", "WebSockets"),
    e("pusher", "Pusher"),
    e("pusher-js", "Pusher"),
    e("ably", "Ably"),
    e("@supabase/realtime-js", "Supabase Realtime"),
    e("@liveblocks/*", "Liveblocks"),
    e("channels", "Django Channels"),
];

pub(crate) const FILE_UPLOADS: &[Entry] = &[
    e("multer", "Multer"),
    e("uploadthing", "UploadThing"),
    e("@uploadthing/*", "UploadThing"),
    e("react-dropzone", "react-dropzone"),
    e("formidable", "Formidable"),
    e("busboy", "Busboy"),
    e("@aws-sdk/client-s3", "Amazon S3"),
    e("cloudinary", "Cloudinary"),
    e("@vercel/blob", "Vercel Blob"),
    e("filepond", "FilePond"),
];

pub(crate) const SEARCH: &[Entry] = &[
    e("algoliasearch", "Algolia"),
    e("react-instantsearch", "Algolia"),
    e("@docsearch/react", "Algolia DocSearch"),
    e("meilisearch", "Meilisearch"),
    e("typesense", "Typesense"),
    e("fuse.js", "Fuse.js"),
    e("flexsearch", "FlexSearch"),
    e("lunr", "Lunr"),
    e("pagefind", "Pagefind"),
];

pub(crate) const I18N: &[Entry] = &[
    e("next-intl", "next-intl"),
    e("next-i18next", "next-i18next"),
    e("react-i18next", "react-i18next"),
    e("i18next", "i18next"),
    e("vue-i18n", "vue-i18n"),
    e("@nuxtjs/i18n", "Nuxt i18n"),
    e("@lingui/core", "Lingui"),
    e("react-intl", "react-intl"),
];

pub(crate) const FORMS: &[Entry] = &[
    e("react-hook-form", "React Hook Form"),
    e("formik", "Formik"),
    e("@formspree/react", "Formspree"),
    e("final-form", "Final Form"),
    e("vee-validate", "VeeValidate"),
    e("@tanstack/react-form", "TanStack Form"),
];

pub(crate) const CHARTS: &[Entry] = &[
    e("recharts", "Recharts"),
    e("chart.js", "Chart.js"),
    e("react-chartjs-2", "Chart.js"),
    e("@nivo/*", "Nivo"),
    e("victory", "Victory"),
    e("d3", "D3"),
    e("apexcharts", "ApexCharts"),
    e("echarts", "ECharts"),
    e("@tremor/react", "Tremor"),
    e("highcharts", "Highcharts"),
    e("plotly.js", "Plotly"),
];

pub(crate) const TEST_FRAMEWORKS: &[Entry] = &[
    e("vitest", "Vitest"),
    e("jest", "Jest"),
    e("@playwright/test", "Playwright"),
    e("cypress", "Cypress"),
    e("mocha", "Mocha"),
    e("@testing-library/react", "Testing Library"),
    e("pytest", "pytest"),
    e("rspec", "RSpec"),
    e("phpunit/phpunit", "PHPUnit"),
];

pub(crate) const SEO_PACKAGES: &[Entry] = &[
    e("next-sitemap", "next-sitemap"),
    e("next-seo", "next-seo"),
    e("@astrojs/sitemap", "Astro Sitemap"),
    e("gatsby-plugin-sitemap", "Gatsby Sitemap"),
    e("@nuxtjs/sitemap", "Nuxt Sitemap"),
    e("react-helmet", "React Helmet"),
    e("react-helmet-async", "React Helmet"),
    e("@unhead/vue", "Unhead"),
];

pub(crate) const MARKDOWN_TOOLING: &[Entry] = &[
    e("@next/mdx", "MDX"),
    e("@mdx-js/*", "MDX"),
    e("next-mdx-remote", "MDX"),
    e("@astrojs/mdx", "MDX"),
    e("gray-matter", "Front matter"),
    e("remark", "remark"),
    e("markdown-it", "markdown-it"),
    e("marked", "marked"),
];

/// Third-party services reached over the network, counted once per label.
pub(crate) const EXTERNAL_SERVICES: &[Entry] = &[
    e("stripe", "Stripe"),
    e("@stripe/*", "Stripe"),
    e("@paypal/*", "PayPal"),
    e("@sendgrid/mail", "SendGrid"),
    e("resend", "Resend"),
    e("postmark", "Postmark"),
    e("twilio", "Twilio"),
    e("@aws-sdk/*", "AWS"),
    e("aws-sdk", "AWS"),
    e("firebase", "Firebase"),
    e("@supabase/supabase-js", "Supabase"),
    e("@sentry/*", "Sentry"),
    e("algoliasearch", "Algolia"),
    e("openai", "OpenAI"),
    e("@anthropic-ai/sdk", "Anthropic"),
    e("cloudinary", "Cloudinary"),
    e("@vercel/blob", "Vercel Blob"),
    e("@upstash/*", "Upstash"),
    e("pusher", "Pusher"),
    e("posthog-js", "PostHog"),
    e("mixpanel-browser", "Mixpanel"),
    e("contentful", "Contentful"),
    e("@sanity/client", "Sanity"),
    e("@clerk/*", "Clerk"),
    e("@auth0/*", "Auth0"),
    e("googleapis", "Google APIs"),
    e("@google-cloud/*", "Google Cloud"),
    e("@mailchimp/mailchimp_marketing", "Mailchimp"),
];
