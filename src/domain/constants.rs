/// Secret-bearing file names. Matched against the file name unless the
/// pattern contains a `/`.
pub const DEFAULT_DENY: &[&str] = &[
    ".env",
    ".env.*",
    "*.env",
    ".flaskenv",
    "credentials.json",
    "client_secret*.json",
    "service-account*.json",
    "token.json",
    "*.pem",
    "*.key",
    "*.p12",
    "id_rsa*",
    "*.db",
    "*.sqlite",
    "*.sqlite3",
];

/// Configuration templates that look like deny matches but carry no values.
pub const DEFAULT_ALLOW_OVERRIDE: &[&str] = &[".env.example", ".env.sample", ".env.template"];

pub const DEFAULT_ALLOW: &[&str] = &[
    // source
    "*.py",
    "*.js",
    "*.ts",
    "*.jsx",
    "*.tsx",
    "*.html",
    "*.css",
    "*.rs",
    "*.sql",
    // dependency manifests
    "requirements.txt",
    "Pipfile",
    "Pipfile.lock",
    "pyproject.toml",
    "package.json",
    "package-lock.json",
    "Cargo.toml",
    "Cargo.lock",
    // platform config
    "Procfile",
    "runtime.txt",
    "render.yaml",
    "railway.json",
    "vercel.json",
    "Dockerfile",
    ".gitignore",
    ".dockerignore",
    // docs
    "*.md",
    "LICENSE",
];

pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    "target",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
];

/// Files larger than this are not read; they are held back as unscanned.
pub const MAX_SCAN_BYTES: u64 = 1024 * 1024;

/// One variable of the backend's runtime environment contract.
#[derive(Debug, Clone, Copy)]
pub struct EnvVarDef {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

pub const BACKEND_ENV: &[EnvVarDef] = &[
    EnvVarDef {
        name: "GOOGLE_CLIENT_ID",
        required: true,
        description: "OAuth client id used for the GA4 consent flow",
    },
    EnvVarDef {
        name: "GOOGLE_CLIENT_SECRET",
        required: true,
        description: "OAuth client secret used for the GA4 token exchange",
    },
    EnvVarDef {
        name: "SECRET_KEY",
        required: true,
        description: "Session signing key; the backend falls back to an insecure dev value",
    },
    EnvVarDef {
        name: "JWT_SECRET_KEY",
        required: true,
        description: "JWT signing key; the backend falls back to an insecure dev value",
    },
    EnvVarDef {
        name: "DATABASE_URL",
        required: false,
        description: "Relational database URL, local SQLite when unset",
    },
    EnvVarDef {
        name: "PORT",
        required: false,
        description: "HTTP listen port, 5002 when unset",
    },
    EnvVarDef {
        name: "GOOGLE_APPLICATION_CREDENTIALS",
        required: false,
        description: "Path to the GA4 service-account JSON; the file itself must stay excluded",
    },
];
