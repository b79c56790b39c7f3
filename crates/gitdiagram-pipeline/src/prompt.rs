pub const EXPLANATION_PROMPT: &str = "\
You are explaining to a principal software engineer how to draw the most accurate system design \
diagram of a specific project. You receive the project's complete file tree inside <file_tree> tags \
and its README inside <readme> tags.\n\n\
Work through these steps:\n\
1. Determine what kind of project this is (full-stack application, library, CLI tool, compiler, \
service, ...) and what it is for, using the README and the layout.\n\
2. Read the file structure: top-level directories, patterns that reveal architectural choices \
(layers, MVC, microservices, plugins), build scripts, deployment and configuration files.\n\
3. Pull any architecture, stack or dependency notes out of the README.\n\
4. Explain which components the diagram needs (frontend, backend, storage, build tooling, external \
services, ...), how they interact, which architectural patterns matter, and which technologies play \
a significant role.\n\
5. Tailor the advice to the project type: API layers and data access for applications, extension \
points and integrations for tools, pipeline stages and intermediate representations for compilers.\n\
6. Ask for clear labels, directional arrows for data flow or dependencies, and colors or shapes \
distinguishing kinds of components.\n\n\
Be detailed; splitting the project into as many meaningful components as possible works best.\n\n\
Put your whole answer inside <explanation> tags.";

pub const COMPONENT_MAPPING_PROMPT: &str = "\
You map the components of a system design to the files and directories that implement them. \
You receive the design explanation inside <explanation> tags and the project's file tree inside \
<file_tree> tags.\n\n\
Identify the major components, modules and services named in the explanation, then find the \
directories or specific files in the tree that correspond to them. Include directories and files \
where relevant. Leave out any component without a clear match, and only use paths that appear in \
the file tree.\n\n\
Answer in exactly this format:\n\n\
<component_mapping>\n\
1. [Component Name]: [File/Directory Path]\n\
2. [Component Name]: [File/Directory Path]\n\
</component_mapping>";

pub const DIAGRAM_PROMPT: &str = "\
You are a principal software engineer drawing a system design diagram in Mermaid.js. The design \
explanation is inside <explanation> tags; some of its components have been mapped to repository \
paths inside <component_mapping> tags.\n\n\
Represent every major component and the relationships between them exactly as the explanation \
describes, choosing the Mermaid diagram type that fits. Use shapes that match component kinds \
(cylinders for databases, rectangles for services), concise labels, arrows for data flow, and \
groups for related components. Add color. Lay the diagram out vertically and avoid long \
horizontal rows of nodes.\n\n\
Add a click event for every component listed in the component mapping, using only the \
repository-relative path exactly as mapped, for example `click Example \"app/example.js\"`. Never \
write full URLs; another program expands the paths afterwards. Paths belong only in click events, \
never in node labels.\n\n\
Mermaid syntax rules:\n\
- Quote any label containing special characters: `EX[\"/api/process (Backend)\"]` and \
`A -->|\"calls Process()\"| B`.\n\
- No spaces around edge labels: `A -->|\"label\"| B`, not `A -->| \"label\" | B`.\n\
- Don't attach a class to a subgraph declaration; apply classes to the nodes inside it.\n\
- Don't alias subgraphs: `subgraph \"Layer A\"`, not `subgraph A \"Layer A\"`.\n\
- No `%%{init: ...}%%` declarations.\n\n\
Respond with the Mermaid code only: no code fences, no commentary.";
